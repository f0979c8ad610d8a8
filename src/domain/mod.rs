//! Domain layer: result caching and pagination.
//!
//! This module holds the request-independent pieces the handlers compose:
//! the process-wide [`ResultCache`] and the in-memory [`paginate`] window.

pub mod pagination;
pub mod result_cache;

pub use pagination::paginate;
pub use result_cache::{CacheKeying, CachedRows, ResultCache};
