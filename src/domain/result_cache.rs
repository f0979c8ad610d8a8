//! Read-through cache of query results.
//!
//! [`ResultCache`] maps a key derived from the query to the rows it
//! returned. Entries never expire on their own; any successful write
//! clears the whole cache, whether or not it touched the cached rows.
//!
//! With the default [`CacheKeying::QueryText`] the key is the raw
//! statement text, so two reads that share a statement but bind different
//! parameters share one entry. [`CacheKeying::QueryAndParams`] folds the
//! parameters into the key instead.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::GatewayError;
use crate::persistence::{QueryExecutor, RowMap, SqlParam};

/// Rows shared between the cache and its readers.
pub type CachedRows = Arc<Vec<RowMap>>;

/// How a read is turned into a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheKeying {
    /// The statement text alone. Parameters are ignored.
    #[default]
    QueryText,
    /// The statement text plus every bound parameter.
    QueryAndParams,
}

impl CacheKeying {
    /// Computes the cache key for a read.
    #[must_use]
    pub fn key(self, query: &str, params: &[SqlParam]) -> String {
        match self {
            Self::QueryText => query.to_string(),
            Self::QueryAndParams => {
                let mut key = query.to_string();
                for (index, param) in params.iter().enumerate() {
                    key.push_str(&format!("\u{1f}${}={param}", index + 1));
                }
                key
            }
        }
    }
}

impl FromStr for CacheKeying {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" | "query_text" => Ok(Self::QueryText),
            "query_params" | "query_and_params" => Ok(Self::QueryAndParams),
            other => Err(format!("unknown cache keying: {other}")),
        }
    }
}

impl fmt::Display for CacheKeying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueryText => f.write_str("query"),
            Self::QueryAndParams => f.write_str("query_params"),
        }
    }
}

/// Process-wide cache of read results.
///
/// # Concurrency
///
/// - The lock is never held across a store round-trip.
/// - Two concurrent misses on the same key both reach the store; the
///   later insert wins.
/// - A read that started before a write may insert its rows after the
///   write cleared the cache. No ordering is enforced between them.
#[derive(Debug, Default)]
pub struct ResultCache {
    keying: CacheKeying,
    entries: RwLock<HashMap<String, CachedRows>>,
}

impl ResultCache {
    /// Creates an empty cache with the given keying strategy.
    #[must_use]
    pub fn new(keying: CacheKeying) -> Self {
        Self {
            keying,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the keying strategy.
    #[must_use]
    pub fn keying(&self) -> CacheKeying {
        self.keying
    }

    /// Returns the cached rows for the read, loading them through
    /// `executor` on a miss.
    ///
    /// Failed reads are not cached.
    ///
    /// # Errors
    ///
    /// Propagates the executor's error on a miss.
    pub async fn get_or_load(
        &self,
        executor: &dyn QueryExecutor,
        query: &str,
        params: &[SqlParam],
    ) -> Result<CachedRows, GatewayError> {
        let key = self.keying.key(query, params);

        let cached = self.entries.read().await.get(&key).cloned();
        if let Some(rows) = cached {
            tracing::debug!(rows = rows.len(), "cache hit");
            return Ok(rows);
        }

        tracing::debug!("cache miss");
        let rows: CachedRows = Arc::new(executor.read(query, params).await?);
        self.entries.write().await.insert(key, Arc::clone(&rows));
        Ok(rows)
    }

    /// Removes every entry. Clearing an empty cache is a no-op.
    pub async fn invalidate_all(&self) {
        let mut entries = self.entries.write().await;
        let evicted = entries.len();
        entries.clear();
        tracing::info!(evicted, "cache cleared");
    }

    /// Returns the number of cached reads.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryExecutor;
    use crate::persistence::schema::LIST_EMPLOYEES;

    const BY_EMAIL: &str = "SELECT * FROM public.employees WHERE email = $1";

    fn email(value: &str) -> [SqlParam; 1] {
        [SqlParam::Text(value.to_string())]
    }

    #[tokio::test]
    async fn miss_reads_once_then_hits() {
        let cache = ResultCache::new(CacheKeying::QueryText);
        let executor = MemoryExecutor::seeded();

        let Ok(first) = cache.get_or_load(&executor, LIST_EMPLOYEES, &[]).await else {
            panic!("first load failed");
        };
        assert_eq!(executor.reads(), 1);

        let Ok(second) = cache.get_or_load(&executor, LIST_EMPLOYEES, &[]).await else {
            panic!("second load failed");
        };
        assert_eq!(executor.reads(), 1);
        assert_eq!(first, second);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_read() {
        let cache = ResultCache::new(CacheKeying::QueryText);
        let executor = MemoryExecutor::seeded();

        let _ = cache.get_or_load(&executor, LIST_EMPLOYEES, &[]).await;
        cache.invalidate_all().await;
        assert!(cache.is_empty().await);

        let _ = cache.get_or_load(&executor, LIST_EMPLOYEES, &[]).await;
        assert_eq!(executor.reads(), 2);
    }

    #[tokio::test]
    async fn invalidate_on_empty_cache_is_noop() {
        let cache = ResultCache::default();
        cache.invalidate_all().await;
        cache.invalidate_all().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn failed_reads_are_not_cached() {
        let cache = ResultCache::default();
        let executor = MemoryExecutor::seeded();
        executor.set_failing(true);

        let result = cache.get_or_load(&executor, LIST_EMPLOYEES, &[]).await;
        assert!(result.is_err());
        assert!(cache.is_empty().await);

        executor.set_failing(false);
        assert!(cache.get_or_load(&executor, LIST_EMPLOYEES, &[]).await.is_ok());
        assert_eq!(executor.reads(), 2);
    }

    #[tokio::test]
    async fn query_text_keying_ignores_params() {
        let cache = ResultCache::new(CacheKeying::QueryText);
        let executor = MemoryExecutor::seeded();

        let _ = cache.get_or_load(&executor, BY_EMAIL, &email("a@example.com")).await;
        let _ = cache.get_or_load(&executor, BY_EMAIL, &email("b@example.com")).await;
        assert_eq!(executor.reads(), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn query_and_params_keying_separates_params() {
        let cache = ResultCache::new(CacheKeying::QueryAndParams);
        let executor = MemoryExecutor::seeded();

        let _ = cache.get_or_load(&executor, BY_EMAIL, &email("a@example.com")).await;
        let _ = cache.get_or_load(&executor, BY_EMAIL, &email("b@example.com")).await;
        let _ = cache.get_or_load(&executor, BY_EMAIL, &email("a@example.com")).await;
        assert_eq!(executor.reads(), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[test]
    fn keying_parses_from_config_strings() {
        assert_eq!("query".parse::<CacheKeying>(), Ok(CacheKeying::QueryText));
        assert_eq!(
            "QUERY_PARAMS".parse::<CacheKeying>(),
            Ok(CacheKeying::QueryAndParams)
        );
        assert!("lru".parse::<CacheKeying>().is_err());
        assert_eq!(CacheKeying::QueryAndParams.to_string(), "query_params");
    }

    #[test]
    fn query_and_params_key_differs_from_query_text() {
        let params = email("a@example.com");
        let text = CacheKeying::QueryText.key(BY_EMAIL, &params);
        let full = CacheKeying::QueryAndParams.key(BY_EMAIL, &params);
        assert_eq!(text, BY_EMAIL);
        assert_ne!(text, full);
        assert!(full.starts_with(BY_EMAIL));
    }
}
