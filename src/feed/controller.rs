//! Feed controller
//!
//! Owns one pager, one freshness poller and the page cache they share.
//! Views talk to this instead of the parts.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::{
    FeedKey, FeedPager, FeedSort, FeedSource, FetchStatus, FreshnessPoller, LoadOutcome, PageKey,
    PollOutcome, QueryCache, SkipReason,
};
use crate::client::{ApiClient, ApiResult};
use crate::models::{Comment, LikeStatus, NewPost, Page, Post};

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Poll interval used when none is configured
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    pub key: FeedKey,
    pub page_size: u32,
    pub poll_interval: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            key: FeedKey::default(),
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub struct FeedController<S: FeedSource> {
    source: Arc<S>,
    cache: Arc<QueryCache<PageKey, Page<Post>, S::Error>>,
    pager: FeedPager<S>,
    poller: Arc<FreshnessPoller<S>>,
    polling: Mutex<Option<JoinHandle<()>>>,
}

impl<S: FeedSource> FeedController<S> {
    pub fn new(source: Arc<S>, settings: FeedSettings) -> Self {
        let cache = Arc::new(QueryCache::new());
        let pager = FeedPager::new(
            Arc::clone(&source),
            Arc::clone(&cache),
            settings.key,
            settings.page_size,
        );
        let poller = Arc::new(FreshnessPoller::new(
            Arc::clone(&source),
            settings.key.filter,
            settings.poll_interval,
        ));

        Self {
            source,
            cache,
            pager,
            poller,
            polling: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Load page 1 and take its newest post as seen
    pub async fn load_initial(&self) -> LoadOutcome {
        let outcome = self.pager.load_initial().await;
        if outcome.is_loaded() {
            self.rebaseline().await;
        }
        outcome
    }

    pub async fn on_sentinel(&self, visible: bool) -> LoadOutcome {
        self.pager.on_sentinel(visible).await
    }

    /// Switch sort/filter, load page 1 of the new key and re-baseline
    pub async fn set_key(&self, key: FeedKey) -> LoadOutcome {
        if !self.pager.set_key(key).await {
            return LoadOutcome::Skipped(SkipReason::AlreadyLoaded);
        }
        tracing::info!(feed = %key, "Feed key changed");
        self.poller.set_filter(key.filter).await;

        let outcome = self.pager.load_next().await;
        if outcome.is_loaded() {
            self.rebaseline().await;
        }
        outcome
    }

    /// Full refetch of the current key; clears the new-posts flag on success
    pub async fn refresh(&self) -> LoadOutcome {
        let outcome = self.pager.refresh().await;
        if outcome.is_loaded() {
            self.rebaseline().await;
        }
        outcome
    }

    /// Newest-first feeds render their newest post first; ranked feeds
    /// need a separate newest-post lookup.
    async fn rebaseline(&self) {
        if self.pager.key().await.sort == FeedSort::Newest {
            self.poller.mark_seen(self.pager.newest_id().await).await;
        } else {
            self.poller.baseline().await;
        }
    }

    /// One freshness check, outside the background loop
    pub async fn poll_once(&self) -> PollOutcome {
        self.poller.poll_once().await
    }

    pub fn has_new(&self) -> bool {
        self.poller.has_new()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.poller.subscribe()
    }

    /// Start background polling; a no-op while it is already running
    pub async fn start_polling(&self) {
        let mut polling = self.polling.lock().await;
        if polling.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }
        tracing::debug!(interval = ?self.poller.interval(), "Starting freshness polling");
        *polling = Some(Arc::clone(&self.poller).start());
    }

    pub async fn stop_polling(&self) {
        self.poller.stop().await;
        if let Some(handle) = self.polling.lock().await.take() {
            handle.abort();
        }
    }

    pub async fn is_polling(&self) -> bool {
        self.polling
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.pager.posts().await
    }

    pub async fn status(&self) -> FetchStatus {
        self.pager.status().await
    }

    pub async fn has_more(&self) -> bool {
        self.pager.has_more().await
    }

    /// See [`FeedPager::wants_more`]
    pub async fn wants_more(&self) -> bool {
        self.pager.wants_more().await
    }

    pub async fn key(&self) -> FeedKey {
        self.pager.key().await
    }

    /// Drop every cached page of every key
    pub async fn invalidate(&self) {
        self.cache.clear().await;
    }
}

impl FeedController<ApiClient> {
    /// Publish a post. It shows up on the next refresh.
    pub async fn create_post(&self, post: &NewPost) -> ApiResult<Post> {
        let created = self.source.create_post(post).await?;
        self.invalidate().await;
        Ok(created)
    }

    pub async fn delete_post(&self, post_id: &str) -> ApiResult<()> {
        self.source.delete_post(post_id).await?;
        self.invalidate().await;
        self.pager.remove_post(post_id).await;
        Ok(())
    }

    /// Like the post if the user has not liked it yet, unlike it otherwise
    pub async fn toggle_like(&self, post_id: &str) -> ApiResult<LikeStatus> {
        let liked = match self.pager.post(post_id).await {
            Some(post) => post.liked_by_me,
            None => self.source.get_post(post_id).await?.liked_by_me,
        };

        let status = if liked {
            self.source.unlike_post(post_id).await?
        } else {
            self.source.like_post(post_id).await?
        };

        self.invalidate().await;
        self.pager
            .patch_post(post_id, |post| {
                post.liked_by_me = status.liked;
                post.like_count = status.like_count;
            })
            .await;
        Ok(status)
    }

    pub async fn add_comment(&self, post_id: &str, body: &str) -> ApiResult<Comment> {
        let comment = self.source.add_comment(post_id, body).await?;
        self.invalidate().await;
        self.pager
            .patch_post(post_id, |post| post.comment_count += 1)
            .await;
        Ok(comment)
    }
}
