//! Tracing subscriber setup shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Setting
/// `LOG_FORMAT=json` switches to one JSON object per line.
pub fn init() {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
