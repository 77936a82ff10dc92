//! Where feed pages come from

use async_trait::async_trait;

use super::{FeedFilter, FeedKey, Retryable};
use crate::models::{Page, Post};

/// A paged post listing plus a "newest post" lookup
///
/// The REST client is the production implementation.
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
    type Error: Retryable + std::fmt::Display + Send + Sync + 'static;

    /// One page (1-based) of the listing for `key`
    async fn fetch_page(&self, key: &FeedKey, page: u32, limit: u32) -> Result<Page<Post>, Self::Error>;

    /// The single newest post matching `filter`, if any
    async fn fetch_newest(&self, filter: FeedFilter) -> Result<Option<Post>, Self::Error>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory feed for pager, poller and controller tests

    use super::*;
    use crate::models::UserSummary;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::{RwLock, Semaphore};

    #[derive(Debug)]
    pub struct MemoryError(pub String);

    impl std::fmt::Display for MemoryError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl Retryable for MemoryError {}

    pub fn post(n: u32) -> Post {
        Post {
            id: format!("p{}", n),
            author: UserSummary {
                id: "u1".to_string(),
                username: "ash".to_string(),
                display_name: None,
                avatar_url: None,
            },
            body: format!("post {}", n),
            image_url: None,
            review_id: if n % 3 == 0 { Some(format!("r{}", n)) } else { None },
            like_count: n,
            comment_count: 0,
            liked_by_me: false,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(n as i64),
            updated_at: None,
        }
    }

    /// Newest-first posts; page and newest-post requests are counted, can be made
    /// to fail, and can be held at a gate until the test releases them
    pub struct MemoryFeed {
        pub posts: RwLock<Vec<Post>>,
        pub page_calls: AtomicU32,
        pub newest_calls: AtomicU32,
        pub fail_next: AtomicU32,
        gate: Option<Semaphore>,
    }

    impl MemoryFeed {
        /// `count` posts, newest (highest number) first
        pub fn with_posts(count: u32) -> Self {
            Self {
                posts: RwLock::new((1..=count).rev().map(post).collect()),
                page_calls: AtomicU32::new(0),
                newest_calls: AtomicU32::new(0),
                fail_next: AtomicU32::new(0),
                gate: None,
            }
        }

        /// Page fetches block until `release` adds permits
        pub fn gated(mut self) -> Self {
            self.gate = Some(Semaphore::new(0));
            self
        }

        pub fn release(&self, n: usize) {
            if let Some(gate) = &self.gate {
                gate.add_permits(n);
            }
        }

        pub async fn publish(&self, n: u32) {
            self.posts.write().await.insert(0, post(n));
        }

        pub fn page_calls(&self) -> u32 {
            self.page_calls.load(Ordering::SeqCst)
        }

        fn take_failure(&self) -> bool {
            self.fail_next
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    #[async_trait]
    impl FeedSource for MemoryFeed {
        type Error = MemoryError;

        async fn fetch_page(&self, key: &FeedKey, page: u32, limit: u32) -> Result<Page<Post>, MemoryError> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await.map_err(|e| MemoryError(e.to_string()))?.forget();
            }
            if self.take_failure() {
                return Err(MemoryError("backend down".to_string()));
            }

            let posts = self.posts.read().await;
            let filtered: Vec<Post> = posts
                .iter()
                .filter(|p| key.filter != FeedFilter::Reviews || p.review_id.is_some())
                .cloned()
                .collect();
            Ok(Page::slice(&filtered, page, limit))
        }

        async fn fetch_newest(&self, filter: FeedFilter) -> Result<Option<Post>, MemoryError> {
            self.newest_calls.fetch_add(1, Ordering::SeqCst);
            if self.take_failure() {
                return Err(MemoryError("backend down".to_string()));
            }
            let posts = self.posts.read().await;
            Ok(posts
                .iter()
                .find(|p| filter != FeedFilter::Reviews || p.review_id.is_some())
                .cloned())
        }
    }
}
