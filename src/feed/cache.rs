//! Query cache
//!
//! Keyed cache of fetched values. Concurrent fetches of the same key share
//! one in-flight load; failed loads are retried once and never cached.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Whether a failed load is worth repeating
pub trait Retryable {
    fn is_retryable(&self) -> bool {
        true
    }
}

/// Retry count applied when none is configured
pub const DEFAULT_RETRIES: u32 = 1;

/// Result handed to every caller that joined one load
pub type Shared<V, E> = Result<V, Arc<E>>;

enum Slot<V, E> {
    Ready(V),
    /// `id` tells a finishing load whether its slot was invalidated meanwhile
    Loading {
        id: u64,
        outcome: watch::Receiver<Option<Shared<V, E>>>,
    },
}

pub struct QueryCache<K, V, E> {
    entries: Mutex<HashMap<K, Slot<V, E>>>,
    next_load: AtomicU64,
    retries: u32,
}

impl<K, V, E> QueryCache<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: Retryable + std::fmt::Display,
{
    pub fn new() -> Self {
        Self::with_retries(DEFAULT_RETRIES)
    }

    pub fn with_retries(retries: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next_load: AtomicU64::new(0),
            retries,
        }
    }

    /// Cached value for `key`, or the result of running `loader`
    ///
    /// Callers racing on the same key wait for the first caller's load and
    /// receive its outcome, failure included. Only a later call starts over.
    pub async fn fetch<F, Fut>(&self, key: K, loader: F) -> Shared<V, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        loop {
            let (id, publish) = {
                let mut entries = self.entries.lock().await;
                let running = match entries.get(&key) {
                    Some(Slot::Ready(value)) => return Ok(value.clone()),
                    // a closed channel means the loading caller was dropped
                    Some(Slot::Loading { outcome, .. }) if outcome.has_changed().is_ok() => {
                        Some(outcome.clone())
                    }
                    _ => None,
                };

                match running {
                    Some(outcome) => {
                        drop(entries);
                        match Self::join(outcome).await {
                            Some(shared) => return shared,
                            None => continue,
                        }
                    }
                    None => {
                        let id = self.next_load.fetch_add(1, Ordering::Relaxed);
                        let (publish, outcome) = watch::channel(None);
                        entries.insert(key.clone(), Slot::Loading { id, outcome });
                        (id, publish)
                    }
                }
            };

            let shared = self.load(&loader).await.map_err(Arc::new);

            {
                let mut entries = self.entries.lock().await;
                let ours = matches!(entries.get(&key), Some(Slot::Loading { id: current, .. }) if *current == id);
                if ours {
                    match &shared {
                        Ok(value) => {
                            entries.insert(key.clone(), Slot::Ready(value.clone()));
                        }
                        Err(_) => {
                            entries.remove(&key);
                        }
                    }
                }
            }

            publish.send_replace(Some(shared.clone()));
            return shared;
        }
    }

    /// Run `loader`, repeating retryable failures up to the retry budget
    async fn load<F, Fut>(&self, loader: &F) -> Result<V, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let mut attempt = 0;
        loop {
            match loader().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retries && e.is_retryable() => {
                    attempt += 1;
                    tracing::debug!(attempt, error = %e, "Retrying query");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Outcome of another caller's load; `None` if that caller went away
    async fn join(mut outcome: watch::Receiver<Option<Shared<V, E>>>) -> Option<Shared<V, E>> {
        loop {
            let settled = outcome.borrow_and_update().clone();
            if settled.is_some() {
                return settled;
            }
            if outcome.changed().await.is_err() {
                let last = outcome.borrow().clone();
                return last;
            }
        }
    }

    /// Cached value without loading
    pub async fn get(&self, key: &K) -> Option<V> {
        match self.entries.lock().await.get(key) {
            Some(Slot::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub async fn contains(&self, key: &K) -> bool {
        self.get(key).await.is_some()
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.lock().await.remove(key);
    }

    /// Drop every entry whose key matches; returns how many were dropped
    pub async fn invalidate_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&K) -> bool,
    {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|k, _| !predicate(k));
        before - entries.len()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Number of keys with a loaded value
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|slot| matches!(slot, Slot::Ready(_))).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<K, V, E> Default for QueryCache<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: Retryable + std::fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    struct TestError {
        retryable: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error")
        }
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let cache: QueryCache<&str, u32, TestError> = QueryCache::new();
        let calls = &AtomicU32::new(0);

        for _ in 0..3 {
            let value = cache
                .fetch("a", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, TestError>(7)
                })
                .await
                .unwrap();
            assert_eq!(value, 7);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&"a").await, Some(7));
    }

    #[tokio::test]
    async fn test_concurrent_fetches_are_deduplicated() {
        let cache: Arc<QueryCache<u32, String, TestError>> = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .fetch(1, || {
                        let calls = Arc::clone(&calls);
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(30)).await;
                            Ok::<_, TestError>("page".to_string())
                        }
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), "page");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_failures_share_one_load() {
        let cache: Arc<QueryCache<u32, String, TestError>> = Arc::new(QueryCache::new());
        let calls = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .fetch(1, || {
                        let calls = Arc::clone(&calls);
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Err::<String, _>(TestError { retryable: true })
                        }
                    })
                    .await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_err());
        }
        // one load plus its single retry, however many callers waited
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!cache.contains(&1).await);

        // the failure is not cached: a later call loads again
        let value = cache
            .fetch(1, || async { Ok::<_, TestError>("page".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "page");
    }

    #[tokio::test]
    async fn test_dropped_loader_does_not_strand_waiters() {
        let cache: Arc<QueryCache<u32, u32, TestError>> = Arc::new(QueryCache::new());

        let stalled = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .fetch(1, || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok::<_, TestError>(0)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let waiter = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.fetch(1, || async { Ok::<_, TestError>(9) }).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        stalled.abort();

        let value = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter stranded")
            .unwrap()
            .unwrap();
        assert_eq!(value, 9);
    }

    #[tokio::test]
    async fn test_failure_retried_once_then_surfaced() {
        let cache: QueryCache<&str, u32, TestError> = QueryCache::new();
        let calls = &AtomicU32::new(0);

        let result = cache
            .fetch("k", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TestError { retryable: true })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!cache.contains(&"k").await);
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let cache: QueryCache<&str, u32, TestError> = QueryCache::new();
        let calls = &AtomicU32::new(0);

        let value = cache
            .fetch("k", || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(TestError { retryable: true })
                } else {
                    Ok(3)
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_failure_not_repeated() {
        let cache: QueryCache<&str, u32, TestError> = QueryCache::new();
        let calls = &AtomicU32::new(0);

        let _ = cache
            .fetch("k", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(TestError { retryable: false })
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let cache: QueryCache<(u8, u32), u32, TestError> = QueryCache::new();
        let calls = &AtomicU32::new(0);
        let load = || async move {
            Ok::<_, TestError>(calls.fetch_add(1, Ordering::SeqCst))
        };

        cache.fetch((1, 1), load).await.unwrap();
        cache.fetch((1, 2), load).await.unwrap();
        cache.fetch((2, 1), load).await.unwrap();
        assert_eq!(cache.len().await, 3);

        let dropped = cache.invalidate_where(|(feed, _)| *feed == 1).await;
        assert_eq!(dropped, 2);
        assert_eq!(cache.len().await, 1);

        let reloaded = cache.fetch((1, 1), load).await.unwrap();
        assert_eq!(reloaded, 3);

        cache.invalidate(&(2, 1)).await;
        assert!(!cache.contains(&(2, 1)).await);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
