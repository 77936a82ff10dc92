//! Paginated feed loading
//!
//! Pages are appended in arrival order. The next page is requested only
//! when the end-of-feed sentinel is visible, no fetch is in flight and the
//! last page reported more to come.
//!
//! An intersection observer reports only changes, so the pager remembers the
//! last reported visibility. After a page lands, `wants_more` tells the view
//! whether a still-visible sentinel should pull the following page.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::{FeedKey, FeedSource, PageKey, QueryCache};
use crate::models::{Page, Post};

/// Fetch state of the pager, mirrored by the UI as spinner / error text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Fetching,
    Failed(String),
}

/// Why a load request did not hit the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotVisible,
    InFlight,
    Exhausted,
    AlreadyLoaded,
}

/// Result of a load request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { page: u32, items: usize, has_more: bool },
    Skipped(SkipReason),
    Failed(String),
    /// The key changed or the feed was refreshed while this page was in flight
    Superseded,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

#[derive(Debug)]
struct PagerState {
    key: FeedKey,
    generation: u64,
    pages: Vec<Page<Post>>,
    status: FetchStatus,
    has_more: bool,
    sentinel_visible: bool,
}

impl PagerState {
    fn reset(&mut self) {
        self.generation += 1;
        self.pages.clear();
        self.status = FetchStatus::Idle;
        self.has_more = true;
    }
}

pub struct FeedPager<S: FeedSource> {
    source: Arc<S>,
    cache: Arc<QueryCache<PageKey, Page<Post>, S::Error>>,
    page_size: u32,
    state: Mutex<PagerState>,
}

impl<S: FeedSource> FeedPager<S> {
    pub fn new(
        source: Arc<S>,
        cache: Arc<QueryCache<PageKey, Page<Post>, S::Error>>,
        key: FeedKey,
        page_size: u32,
    ) -> Self {
        Self {
            source,
            cache,
            page_size: page_size.max(1),
            state: Mutex::new(PagerState {
                key,
                generation: 0,
                pages: Vec::new(),
                status: FetchStatus::Idle,
                has_more: true,
                sentinel_visible: false,
            }),
        }
    }

    /// Sentinel visibility changed; loads the next page when allowed
    pub async fn on_sentinel(&self, visible: bool) -> LoadOutcome {
        self.state.lock().await.sentinel_visible = visible;
        if !visible {
            return LoadOutcome::Skipped(SkipReason::NotVisible);
        }
        self.load_next().await
    }

    /// Load page 1 if nothing is loaded yet
    pub async fn load_initial(&self) -> LoadOutcome {
        let empty = self.state.lock().await.pages.is_empty();
        if empty {
            self.load_next().await
        } else {
            LoadOutcome::Skipped(SkipReason::AlreadyLoaded)
        }
    }

    /// Request page N+1 unless a fetch is in flight or the feed is exhausted
    pub async fn load_next(&self) -> LoadOutcome {
        let (key, generation, page) = {
            let mut state = self.state.lock().await;
            if state.status == FetchStatus::Fetching {
                return LoadOutcome::Skipped(SkipReason::InFlight);
            }
            if !state.has_more {
                return LoadOutcome::Skipped(SkipReason::Exhausted);
            }
            state.status = FetchStatus::Fetching;
            (state.key, state.generation, state.pages.len() as u32 + 1)
        };

        tracing::debug!(feed = %key, page, "Loading feed page");
        let source = &self.source;
        let limit = self.page_size;
        let result = self
            .cache
            .fetch(PageKey { feed: key, page }, || source.fetch_page(&key, page, limit))
            .await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(feed = %key, page, "Dropping superseded feed page");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(loaded) => {
                let items = loaded.len();
                let has_more = loaded.has_more;
                state.has_more = has_more;
                state.pages.push(loaded);
                state.status = FetchStatus::Idle;
                LoadOutcome::Loaded {
                    page,
                    items,
                    has_more,
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(feed = %key, page, error = %message, "Feed page failed");
                state.status = FetchStatus::Failed(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Switch to another sort/filter; returns false if `key` is already current
    pub async fn set_key(&self, key: FeedKey) -> bool {
        let mut state = self.state.lock().await;
        if state.key == key {
            return false;
        }
        state.key = key;
        state.reset();
        true
    }

    /// Drop every cached page of the current key and reload page 1
    pub async fn refresh(&self) -> LoadOutcome {
        let key = {
            let mut state = self.state.lock().await;
            state.reset();
            state.key
        };
        self.cache.invalidate_where(|k| k.feed == key).await;
        self.load_next().await
    }

    /// Replace a loaded post in place, e.g. after a like round-trip
    pub async fn patch_post<F>(&self, post_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Post),
    {
        let mut state = self.state.lock().await;
        let found = state
            .pages
            .iter_mut()
            .flat_map(|p| p.data.iter_mut())
            .find(|p| p.id == post_id);
        match found {
            Some(post) => {
                f(post);
                true
            }
            None => false,
        }
    }

    /// Remove a loaded post, e.g. after deleting it
    pub async fn remove_post(&self, post_id: &str) -> bool {
        let mut state = self.state.lock().await;
        let mut removed = false;
        for page in state.pages.iter_mut() {
            let before = page.data.len();
            page.data.retain(|p| p.id != post_id);
            removed |= page.data.len() != before;
        }
        removed
    }

    /// Loaded posts, flattened in arrival order
    pub async fn posts(&self) -> Vec<Post> {
        let state = self.state.lock().await;
        state.pages.iter().flat_map(|p| p.data.iter().cloned()).collect()
    }

    pub async fn post(&self, post_id: &str) -> Option<Post> {
        let state = self.state.lock().await;
        state
            .pages
            .iter()
            .flat_map(|p| p.data.iter())
            .find(|p| p.id == post_id)
            .cloned()
    }

    /// Id of the first rendered post
    pub async fn newest_id(&self) -> Option<String> {
        let state = self.state.lock().await;
        state
            .pages
            .iter()
            .flat_map(|p| p.data.iter())
            .next()
            .map(|p| p.id.clone())
    }

    pub async fn key(&self) -> FeedKey {
        self.state.lock().await.key
    }

    pub async fn status(&self) -> FetchStatus {
        self.state.lock().await.status.clone()
    }

    pub async fn has_more(&self) -> bool {
        self.state.lock().await.has_more
    }

    /// Sentinel last reported visible, nothing in flight, more to load
    pub async fn wants_more(&self) -> bool {
        let state = self.state.lock().await;
        state.sentinel_visible && state.has_more && state.status != FetchStatus::Fetching
    }

    pub async fn page_count(&self) -> usize {
        self.state.lock().await.pages.len()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::source::testing::MemoryFeed;
    use crate::feed::{FeedFilter, FeedSort};
    use std::sync::atomic::Ordering;

    fn pager(feed: Arc<MemoryFeed>, page_size: u32) -> FeedPager<MemoryFeed> {
        FeedPager::new(feed, Arc::new(QueryCache::new()), FeedKey::default(), page_size)
    }

    #[tokio::test]
    async fn test_pages_append_in_arrival_order() {
        let feed = Arc::new(MemoryFeed::with_posts(25));
        let pager = pager(Arc::clone(&feed), 10);

        assert!(pager.load_initial().await.is_loaded());
        assert!(pager.on_sentinel(true).await.is_loaded());
        let last = pager.on_sentinel(true).await;
        assert_eq!(
            last,
            LoadOutcome::Loaded {
                page: 3,
                items: 5,
                has_more: false
            }
        );

        let ids: Vec<String> = pager.posts().await.into_iter().map(|p| p.id).collect();
        let expected: Vec<String> = (1..=25).rev().map(|n| format!("p{}", n)).collect();
        assert_eq!(ids, expected);
        assert_eq!(pager.newest_id().await.as_deref(), Some("p25"));
    }

    #[tokio::test]
    async fn test_hidden_sentinel_does_not_fetch() {
        let feed = Arc::new(MemoryFeed::with_posts(25));
        let pager = pager(Arc::clone(&feed), 10);

        pager.load_initial().await;
        assert_eq!(
            pager.on_sentinel(false).await,
            LoadOutcome::Skipped(SkipReason::NotVisible)
        );
        assert_eq!(feed.page_calls(), 1);
        assert_eq!(pager.page_count().await, 1);
    }

    #[tokio::test]
    async fn test_exhausted_feed_stops_requesting() {
        let feed = Arc::new(MemoryFeed::with_posts(4));
        let pager = pager(Arc::clone(&feed), 10);

        pager.load_initial().await;
        assert!(!pager.has_more().await);
        assert_eq!(
            pager.on_sentinel(true).await,
            LoadOutcome::Skipped(SkipReason::Exhausted)
        );
        assert_eq!(feed.page_calls(), 1);
    }

    #[tokio::test]
    async fn test_visible_sentinel_remembered_across_in_flight_load() {
        let feed = Arc::new(MemoryFeed::with_posts(30).gated());
        let pager = Arc::new(pager(Arc::clone(&feed), 10));

        let first = {
            let pager = Arc::clone(&pager);
            tokio::spawn(async move { pager.on_sentinel(true).await })
        };
        while pager.status().await != FetchStatus::Fetching {
            tokio::task::yield_now().await;
        }
        assert!(!pager.wants_more().await);
        assert_eq!(
            pager.on_sentinel(true).await,
            LoadOutcome::Skipped(SkipReason::InFlight)
        );

        feed.release(1);
        assert!(first.await.unwrap().is_loaded());

        // no new intersection event arrives, but the sentinel is still in view
        assert!(pager.wants_more().await);
        feed.release(1);
        assert!(pager.load_next().await.is_loaded());
        assert_eq!(pager.page_count().await, 2);

        pager.on_sentinel(false).await;
        assert!(!pager.wants_more().await);
    }

    #[tokio::test]
    async fn test_sentinel_ignored_while_fetch_in_flight() {
        let feed = Arc::new(MemoryFeed::with_posts(30).gated());
        let pager = Arc::new(pager(Arc::clone(&feed), 10));

        let first = {
            let pager = Arc::clone(&pager);
            tokio::spawn(async move { pager.on_sentinel(true).await })
        };
        while pager.status().await != FetchStatus::Fetching {
            tokio::task::yield_now().await;
        }

        assert_eq!(
            pager.on_sentinel(true).await,
            LoadOutcome::Skipped(SkipReason::InFlight)
        );

        feed.release(1);
        assert!(first.await.unwrap().is_loaded());
        assert_eq!(feed.page_calls(), 1);

        feed.release(1);
        assert_eq!(
            pager.on_sentinel(true).await,
            LoadOutcome::Loaded {
                page: 2,
                items: 10,
                has_more: true
            }
        );
    }

    #[tokio::test]
    async fn test_failure_surfaces_and_next_intersection_retries() {
        let feed = Arc::new(MemoryFeed::with_posts(25));
        let pager = pager(Arc::clone(&feed), 10);
        pager.load_initial().await;

        // one failure is absorbed by the cache's single retry
        feed.fail_next.store(2, Ordering::SeqCst);
        let outcome = pager.on_sentinel(true).await;
        assert_eq!(outcome, LoadOutcome::Failed("backend down".to_string()));
        assert_eq!(pager.status().await, FetchStatus::Failed("backend down".to_string()));
        assert_eq!(pager.page_count().await, 1);

        assert!(pager.on_sentinel(true).await.is_loaded());
        assert_eq!(pager.status().await, FetchStatus::Idle);
        assert_eq!(pager.page_count().await, 2);
    }

    #[tokio::test]
    async fn test_key_change_discards_in_flight_page() {
        let feed = Arc::new(MemoryFeed::with_posts(30).gated());
        let pager = Arc::new(pager(Arc::clone(&feed), 10));

        let stale = {
            let pager = Arc::clone(&pager);
            tokio::spawn(async move { pager.load_initial().await })
        };
        while pager.status().await != FetchStatus::Fetching {
            tokio::task::yield_now().await;
        }

        let reviews = FeedKey::new(FeedSort::Newest, FeedFilter::Reviews);
        assert!(pager.set_key(reviews).await);
        assert!(!pager.set_key(reviews).await);

        feed.release(2);
        let fresh = pager.load_initial().await;
        assert!(fresh.is_loaded());
        assert_eq!(stale.await.unwrap(), LoadOutcome::Superseded);

        let posts = pager.posts().await;
        assert!(posts.iter().all(|p| p.review_id.is_some()));
        assert_eq!(pager.page_count().await, 1);
    }

    #[tokio::test]
    async fn test_refresh_refetches_from_source() {
        let feed = Arc::new(MemoryFeed::with_posts(25));
        let pager = pager(Arc::clone(&feed), 10);

        pager.load_initial().await;
        pager.on_sentinel(true).await;
        assert_eq!(feed.page_calls(), 2);

        feed.publish(26).await;
        assert!(pager.refresh().await.is_loaded());

        assert_eq!(feed.page_calls(), 3);
        assert_eq!(pager.page_count().await, 1);
        assert_eq!(pager.newest_id().await.as_deref(), Some("p26"));
    }

    #[tokio::test]
    async fn test_switching_back_reuses_cached_pages() {
        let feed = Arc::new(MemoryFeed::with_posts(25));
        let pager = pager(Arc::clone(&feed), 10);

        pager.load_initial().await;
        pager.set_key(FeedKey::new(FeedSort::Top, FeedFilter::All)).await;
        pager.load_initial().await;
        pager.set_key(FeedKey::default()).await;
        pager.load_initial().await;

        assert_eq!(feed.page_calls(), 2);
        assert_eq!(pager.page_count().await, 1);
    }

    #[tokio::test]
    async fn test_patch_and_remove_loaded_post() {
        let feed = Arc::new(MemoryFeed::with_posts(5));
        let pager = pager(Arc::clone(&feed), 10);
        pager.load_initial().await;

        assert!(pager.patch_post("p3", |p| p.liked_by_me = true).await);
        assert!(!pager.patch_post("p99", |p| p.liked_by_me = true).await);
        let posts = pager.posts().await;
        assert!(posts.iter().find(|p| p.id == "p3").unwrap().liked_by_me);

        assert!(pager.remove_post("p5").await);
        assert_eq!(pager.newest_id().await.as_deref(), Some("p4"));
    }
}
