//! Resolution table caches.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::trace;

use ducktype_core::{
    application::{ApplicationError, ports::ResolutionCache},
    domain::{ResolutionKey, ResolutionTable},
    error::DuckResult,
};

/// Thread-safe memoizing cache.
///
/// Tables are built outside the lock and published whole; the first table
/// published for a key wins, so every adapter for one key shares one table.
#[derive(Clone, Default)]
pub struct InMemoryTableCache {
    inner: Arc<RwLock<HashMap<ResolutionKey, Arc<ResolutionTable>>>>,
}

impl InMemoryTableCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolutionCache for InMemoryTableCache {
    fn get(&self, key: &ResolutionKey) -> DuckResult<Option<Arc<ResolutionTable>>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::CacheLockError)?;

        Ok(inner.get(key).cloned())
    }

    fn publish(&self, table: ResolutionTable) -> DuckResult<Arc<ResolutionTable>> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;

        let key = table.key().clone();
        if let Some(existing) = inner.get(&key) {
            trace!(key = %key, "Table already published; keeping the first");
            return Ok(Arc::clone(existing));
        }

        let table = Arc::new(table);
        inner.insert(key, Arc::clone(&table));
        Ok(table)
    }

    fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    fn clear(&self) -> DuckResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::CacheLockError)?;
        inner.clear();
        Ok(())
    }
}

/// Cache that never stores anything; every adapter recomputes its table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTableCache;

impl ResolutionCache for NoTableCache {
    fn get(&self, _key: &ResolutionKey) -> DuckResult<Option<Arc<ResolutionTable>>> {
        Ok(None)
    }

    fn publish(&self, table: ResolutionTable) -> DuckResult<Arc<ResolutionTable>> {
        Ok(Arc::new(table))
    }

    fn len(&self) -> usize {
        0
    }

    fn clear(&self) -> DuckResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn table(include_private: bool) -> ResolutionTable {
        ResolutionTable::new(
            ResolutionKey::new("zoo::IDuck", "zoo::Duck", include_private),
            vec![],
        )
    }

    #[test]
    fn first_publish_wins() {
        let cache = InMemoryTableCache::new();
        let first = cache.publish(table(false)).unwrap();
        let second = cache.publish(table(false)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn visibility_policy_is_part_of_the_key() {
        let cache = InMemoryTableCache::new();
        cache.publish(table(false)).unwrap();
        cache.publish(table(true)).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.get(table(true).key()).unwrap().is_some());
    }

    #[test]
    fn concurrent_publishers_agree() {
        let cache = InMemoryTableCache::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || cache.publish(table(false)).unwrap())
            })
            .collect();

        let tables: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(tables.iter().all(|t| Arc::ptr_eq(t, &tables[0])));
    }

    #[test]
    fn clear_empties_cache() {
        let cache = InMemoryTableCache::new();
        cache.publish(table(false)).unwrap();
        cache.clear().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn no_cache_never_stores() {
        let cache = NoTableCache;
        let first = cache.publish(table(false)).unwrap();
        assert!(cache.get(first.key()).unwrap().is_none());
        assert!(cache.is_empty());
    }
}
