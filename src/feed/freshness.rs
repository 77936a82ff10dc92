//! New-post freshness polling
//!
//! Samples the single newest post on a fixed interval and compares its id to
//! the last one the reader has seen. A mismatch raises the `has_new` flag,
//! which only reveals a manual refresh affordance; nothing is merged.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

use super::{FeedFilter, FeedSource};

/// What a single poll observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Newest post is the one already seen
    Unchanged,
    /// A post the reader has not seen is now the newest
    NewPost(String),
    /// The feed is empty
    Empty,
    /// The newest-post lookup failed; the flag is left as it was
    Failed(String),
}

pub struct FreshnessPoller<S: FeedSource> {
    source: Arc<S>,
    filter: RwLock<FeedFilter>,
    last_seen: RwLock<Option<String>>,
    has_new: watch::Sender<bool>,
    running: watch::Sender<bool>,
    interval: Duration,
}

impl<S: FeedSource> FreshnessPoller<S> {
    pub fn new(source: Arc<S>, filter: FeedFilter, interval: Duration) -> Self {
        let (has_new, _) = watch::channel(false);
        let (running, _) = watch::channel(false);
        Self {
            source,
            filter: RwLock::new(filter),
            last_seen: RwLock::new(None),
            has_new,
            running,
            interval,
        }
    }

    /// Record the newest id the reader has seen and lower the flag
    pub async fn mark_seen(&self, newest_id: Option<String>) {
        *self.last_seen.write().await = newest_id;
        self.has_new.send_replace(false);
    }

    /// Sample the newest post and take it as seen, without raising the flag
    ///
    /// Used when the rendered feed is not reverse chronological, so its first
    /// post says nothing about what is newest.
    pub async fn baseline(&self) -> PollOutcome {
        let filter = *self.filter.read().await;
        match self.source.fetch_newest(filter).await {
            Ok(newest) => {
                let outcome = match &newest {
                    Some(post) => PollOutcome::NewPost(post.id.clone()),
                    None => PollOutcome::Empty,
                };
                self.mark_seen(newest.map(|p| p.id)).await;
                outcome
            }
            Err(e) => {
                tracing::warn!(error = %e, "Freshness baseline failed");
                PollOutcome::Failed(e.to_string())
            }
        }
    }

    /// Switch the filter being sampled; the caller re-baselines afterwards
    pub async fn set_filter(&self, filter: FeedFilter) {
        *self.filter.write().await = filter;
    }

    /// Fetch the newest post once and compare it to the last seen id
    pub async fn poll_once(&self) -> PollOutcome {
        let filter = *self.filter.read().await;
        let newest = match self.source.fetch_newest(filter).await {
            Ok(newest) => newest,
            Err(e) => {
                tracing::warn!(error = %e, "Freshness poll failed");
                return PollOutcome::Failed(e.to_string());
            }
        };

        let Some(post) = newest else {
            return PollOutcome::Empty;
        };

        let last_seen = self.last_seen.read().await;
        if last_seen.as_deref() == Some(post.id.as_str()) {
            return PollOutcome::Unchanged;
        }

        if !*self.has_new.borrow() {
            tracing::info!(post_id = %post.id, "New posts available");
        }
        self.has_new.send_replace(true);
        PollOutcome::NewPost(post.id)
    }

    pub fn has_new(&self) -> bool {
        *self.has_new.borrow()
    }

    /// Receiver that observes every flag change
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.has_new.subscribe()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll on the configured interval until `stop` is called
    ///
    /// The first poll happens one interval after start. Running is raised
    /// before the task is spawned, so an immediate `stop` always wins.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.send_replace(true);
        let mut running = self.running.subscribe();
        let poller = self;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poller.interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = running.wait_for(|on| !*on) => break,
                }
                if !*running.borrow() {
                    break;
                }

                poller.poll_once().await;
            }

            tracing::debug!("Freshness poller stopped");
        })
    }

    pub async fn stop(&self) {
        self.running.send_replace(false);
    }

    pub async fn is_running(&self) -> bool {
        *self.running.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::source::testing::MemoryFeed;
    use std::sync::atomic::Ordering;

    fn poller(feed: &Arc<MemoryFeed>) -> FreshnessPoller<MemoryFeed> {
        FreshnessPoller::new(Arc::clone(feed), FeedFilter::All, Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_same_newest_id_keeps_flag_down() {
        let feed = Arc::new(MemoryFeed::with_posts(3));
        let poller = poller(&feed);
        poller.mark_seen(Some("p3".to_string())).await;

        assert_eq!(poller.poll_once().await, PollOutcome::Unchanged);
        assert!(!poller.has_new());
    }

    #[tokio::test]
    async fn test_different_newest_id_raises_flag() {
        let feed = Arc::new(MemoryFeed::with_posts(3));
        let poller = poller(&feed);
        poller.mark_seen(Some("p3".to_string())).await;
        let mut rx = poller.subscribe();

        feed.publish(4).await;
        assert_eq!(poller.poll_once().await, PollOutcome::NewPost("p4".to_string()));
        assert!(poller.has_new());
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());

        // still new until the reader refreshes
        assert_eq!(poller.poll_once().await, PollOutcome::NewPost("p4".to_string()));
        assert!(poller.has_new());

        poller.mark_seen(Some("p4".to_string())).await;
        assert!(!poller.has_new());
        assert_eq!(poller.poll_once().await, PollOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_empty_feed_never_raises_flag() {
        let feed = Arc::new(MemoryFeed::with_posts(0));
        let poller = poller(&feed);

        assert_eq!(poller.poll_once().await, PollOutcome::Empty);
        assert!(!poller.has_new());
    }

    #[tokio::test]
    async fn test_first_post_into_empty_feed_raises_flag() {
        let feed = Arc::new(MemoryFeed::with_posts(0));
        let poller = poller(&feed);
        poller.mark_seen(None).await;

        feed.publish(1).await;
        assert_eq!(poller.poll_once().await, PollOutcome::NewPost("p1".to_string()));
        assert!(poller.has_new());
    }

    #[tokio::test]
    async fn test_poll_failure_leaves_flag_unchanged() {
        let feed = Arc::new(MemoryFeed::with_posts(3));
        let poller = poller(&feed);
        poller.mark_seen(Some("p2".to_string())).await;
        poller.poll_once().await;
        assert!(poller.has_new());

        feed.fail_next.store(1, Ordering::SeqCst);
        assert!(matches!(poller.poll_once().await, PollOutcome::Failed(_)));
        assert!(poller.has_new());
    }

    #[tokio::test]
    async fn test_baseline_takes_newest_as_seen() {
        let feed = Arc::new(MemoryFeed::with_posts(5));
        let poller = poller(&feed);

        assert_eq!(poller.baseline().await, PollOutcome::NewPost("p5".to_string()));
        assert!(!poller.has_new());
        assert_eq!(poller.poll_once().await, PollOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_filter_is_respected() {
        let feed = Arc::new(MemoryFeed::with_posts(5));
        let poller = poller(&feed);
        poller.set_filter(FeedFilter::Reviews).await;
        poller.baseline().await;

        // p6 carries a review, p7 does not
        feed.publish(7).await;
        assert_eq!(poller.poll_once().await, PollOutcome::Unchanged);
        feed.publish(6).await;
        assert_eq!(poller.poll_once().await, PollOutcome::NewPost("p6".to_string()));
    }

    #[tokio::test]
    async fn test_stop_right_after_start_ends_loop() {
        let feed = Arc::new(MemoryFeed::with_posts(2));
        let poller = Arc::new(poller(&feed));

        let handle = Arc::clone(&poller).start();
        assert!(poller.is_running().await);
        poller.stop().await;

        // ends without waiting out the 30s interval
        tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .expect("poller kept running after stop")
            .unwrap();
        assert!(!poller.is_running().await);
        assert_eq!(feed.newest_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_background_loop_polls_and_stops() {
        let feed = Arc::new(MemoryFeed::with_posts(2));
        let poller = Arc::new(FreshnessPoller::new(
            Arc::clone(&feed),
            FeedFilter::All,
            Duration::from_millis(10),
        ));
        poller.mark_seen(Some("p2".to_string())).await;
        let mut rx = poller.subscribe();

        let handle = Arc::clone(&poller).start();
        feed.publish(3).await;

        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("poller never raised the flag")
            .unwrap();
        assert!(*rx.borrow());
        assert!(feed.newest_calls.load(Ordering::SeqCst) >= 1);

        poller.stop().await;
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller did not stop")
            .unwrap();
    }
}
