//! Feed State
//!
//! Paginated feed with a per-page cache, the "new posts" flag and the async
//! actions that drive them from the sentinel, the poller and the refresh
//! button.

use gloo_timers::callback::Timeout;
use leptos::*;
use std::collections::HashMap;

use crate::api;
use crate::models::{Page, Post};

/// Posts requested per page
pub const PAGE_SIZE: u32 = 10;

/// Delay before checking whether the sentinel is still in view after a page
/// renders, leaving the observer time to report it scrolled out
const RECHECK_MS: u32 = 150;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FeedSort {
    #[default]
    Newest,
    Top,
}

impl FeedSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSort::Newest => "newest",
            FeedSort::Top => "top",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FeedFilter {
    #[default]
    All,
    Following,
    Reviews,
}

impl FeedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedFilter::All => "all",
            FeedFilter::Following => "following",
            FeedFilter::Reviews => "reviews",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedFilter::All => "Everyone",
            FeedFilter::Following => "Following",
            FeedFilter::Reviews => "Reviews",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FeedKey {
    pub sort: FeedSort,
    pub filter: FeedFilter,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Failed(String),
}

/// Why a sentinel hit did not start a fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Skip {
    NotVisible,
    InFlight,
    Exhausted,
}

/// Loaded pages for one key plus the cache they were served from
#[derive(Clone, Debug, Default)]
pub struct FeedState {
    pub key: FeedKey,
    pages: Vec<Vec<Post>>,
    has_more: bool,
    status: FetchStatus,
    generation: u64,
    cache: HashMap<(FeedKey, u32), Page<Post>>,
    sentinel_visible: bool,
}

impl FeedState {
    pub fn new(key: FeedKey) -> Self {
        Self {
            key,
            has_more: true,
            ..Default::default()
        }
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Vec::is_empty)
    }

    /// The page a sentinel hit should load, if any
    pub fn next_page(&self, visible: bool) -> Result<u32, Skip> {
        if !visible {
            return Err(Skip::NotVisible);
        }
        if self.status == FetchStatus::Fetching {
            return Err(Skip::InFlight);
        }
        if !self.has_more {
            return Err(Skip::Exhausted);
        }
        Ok(self.pages.len() as u32 + 1)
    }

    /// Last visibility the observer reported; it only reports changes
    pub fn note_sentinel(&mut self, visible: bool) {
        self.sentinel_visible = visible;
    }

    /// A still-visible sentinel should pull another page
    pub fn wants_more(&self) -> bool {
        self.sentinel_visible && self.has_more && self.status == FetchStatus::Idle
    }

    /// Mark a fetch as started; the returned generation tags its response
    pub fn begin(&mut self) -> u64 {
        self.status = FetchStatus::Fetching;
        self.generation
    }

    pub fn cached(&self, page: u32) -> Option<Page<Post>> {
        self.cache.get(&(self.key, page)).cloned()
    }

    /// Append a page. Responses for a superseded key are dropped.
    pub fn accept(&mut self, generation: u64, page: Page<Post>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.cache.insert((self.key, page.page), page.clone());
        self.has_more = page.has_more;
        self.pages.push(page.data);
        self.status = FetchStatus::Idle;
        true
    }

    pub fn fail(&mut self, generation: u64, message: String) {
        if generation == self.generation {
            self.status = FetchStatus::Failed(message);
        }
    }

    /// Switch to another key, discarding loaded pages
    pub fn set_key(&mut self, key: FeedKey) {
        self.key = key;
        self.reset();
    }

    /// Drop this key's pages and cache entries so page 1 is refetched
    pub fn refresh(&mut self) {
        let key = self.key;
        self.cache.retain(|(k, _), _| *k != key);
        self.reset();
    }

    /// Forget every cached page after a mutation
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    fn reset(&mut self) {
        self.pages.clear();
        self.has_more = true;
        self.status = FetchStatus::Idle;
        self.generation += 1;
    }

    /// All loaded posts in arrival order
    pub fn posts(&self) -> Vec<Post> {
        self.pages.iter().flatten().cloned().collect()
    }

    pub fn newest_id(&self) -> Option<String> {
        self.pages.iter().flatten().next().map(|p| p.id.clone())
    }

    pub fn patch_post(&mut self, post_id: &str, patch: impl Fn(&mut Post)) {
        for post in self.pages.iter_mut().flatten().filter(|p| p.id == post_id) {
            patch(post);
        }
    }

    pub fn remove_post(&mut self, post_id: &str) {
        for page in &mut self.pages {
            page.retain(|p| p.id != post_id);
        }
    }
}

/// Whether a polled newest post differs from what the feed shows
pub fn is_new(latest: Option<&Post>, last_seen: Option<&str>) -> bool {
    match latest {
        Some(post) => Some(post.id.as_str()) != last_seen,
        None => false,
    }
}

/// Reactive handle shared through context
#[derive(Clone, Copy)]
pub struct FeedStore {
    pub state: RwSignal<FeedState>,
    pub has_new: RwSignal<bool>,
    pub last_seen: RwSignal<Option<String>>,
}

pub fn provide_feed_store() {
    provide_context(FeedStore {
        state: create_rw_signal(FeedState::new(FeedKey::default())),
        has_new: create_rw_signal(false),
        last_seen: create_rw_signal(None),
    });
}

pub fn use_feed() -> FeedStore {
    use_context::<FeedStore>().expect("FeedStore not provided")
}

impl FeedStore {
    /// Sentinel visibility changed
    pub fn on_sentinel(self, visible: bool) {
        self.state.update_untracked(|s| s.note_sentinel(visible));
        self.load_next(visible);
    }

    /// Load the next page if the sentinel is visible and nothing is pending
    pub fn load_next(self, visible: bool) {
        let page = match self.state.with_untracked(|s| s.next_page(visible)) {
            Ok(page) => page,
            Err(_) => return,
        };

        if let Some(cached) = self.state.with_untracked(|s| s.cached(page)) {
            self.state.update(|s| {
                let generation = s.begin();
                s.accept(generation, cached);
            });
            self.after_load(page);
            return;
        }

        let mut generation = 0;
        let mut key = FeedKey::default();
        self.state.update(|s| {
            generation = s.begin();
            key = s.key;
        });

        spawn_local(async move {
            // one retry before surfacing the failure
            let mut result = fetch(key, page).await;
            if result.is_err() {
                result = fetch(key, page).await;
            }

            match result {
                Ok(loaded) => {
                    let mut accepted = false;
                    self.state.update(|s| accepted = s.accept(generation, loaded));
                    if accepted {
                        self.after_load(page);
                    }
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("Feed page {} failed: {}", page, e).into());
                    self.state.update(|s| s.fail(generation, e));
                }
            }
        });
    }

    fn after_load(self, page: u32) {
        if page == 1 {
            self.rebaseline();
        }

        // no observer event arrives if the sentinel never left the viewport
        Timeout::new(RECHECK_MS, move || {
            if self.state.with_untracked(FeedState::wants_more) {
                self.load_next(true);
            }
        })
        .forget();
    }

    /// Make the newest shown post the poll baseline and lower the flag
    fn rebaseline(self) {
        let key = self.state.with_untracked(|s| s.key);
        if key.sort == FeedSort::Newest {
            self.last_seen.set(self.state.with_untracked(FeedState::newest_id));
            self.has_new.set(false);
            return;
        }

        // ranked feeds do not start with the newest post
        spawn_local(async move {
            if let Ok(latest) = api::fetch_latest(key.filter.as_str()).await {
                self.last_seen.set(latest.map(|p| p.id));
                self.has_new.set(false);
            }
        });
    }

    pub fn set_key(self, key: FeedKey) {
        if self.state.with_untracked(|s| s.key == key && !s.is_empty()) {
            return;
        }
        self.state.update(|s| s.set_key(key));
        self.load_next(true);
    }

    /// Full refetch of the current key from page 1
    pub fn refresh(self) {
        self.state.update(FeedState::refresh);
        self.load_next(true);
    }

    /// One freshness check against the server's newest post
    pub fn poll(self) {
        let filter = self.state.with_untracked(|s| s.key.filter);
        spawn_local(async move {
            match api::fetch_latest(filter.as_str()).await {
                Ok(latest) => {
                    let seen = self.last_seen.get_untracked();
                    if is_new(latest.as_ref(), seen.as_deref()) {
                        self.has_new.set(true);
                    }
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("Freshness poll failed: {}", e).into());
                }
            }
        });
    }

    /// Apply a like or comment change to the shown post and drop stale pages
    pub fn patch_post(self, post_id: &str, patch: impl Fn(&mut Post)) {
        self.state.update(|s| {
            s.invalidate();
            s.patch_post(post_id, patch);
        });
    }

    pub fn remove_post(self, post_id: &str) {
        self.state.update(|s| {
            s.invalidate();
            s.remove_post(post_id);
        });
    }

    pub fn invalidate(self) {
        self.state.update(FeedState::invalidate);
    }
}

async fn fetch(key: FeedKey, page: u32) -> Result<Page<Post>, String> {
    api::fetch_feed(key.sort.as_str(), key.filter.as_str(), page, PAGE_SIZE).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserSummary;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            author: UserSummary {
                id: "u1".to_string(),
                username: "ash".to_string(),
                display_name: None,
                avatar_url: None,
            },
            body: "Test".to_string(),
            image_url: None,
            review_id: None,
            like_count: 0,
            comment_count: 0,
            liked_by_me: false,
            created_at: chrono::Utc::now(),
        }
    }

    fn page(n: u32, ids: &[&str], has_more: bool) -> Page<Post> {
        Page {
            data: ids.iter().map(|id| post(id)).collect(),
            page: n,
            has_more,
        }
    }

    #[test]
    fn test_sentinel_gating() {
        let mut state = FeedState::new(FeedKey::default());
        assert_eq!(state.next_page(false), Err(Skip::NotVisible));
        assert_eq!(state.next_page(true), Ok(1));

        let generation = state.begin();
        assert_eq!(state.next_page(true), Err(Skip::InFlight));

        assert!(state.accept(generation, page(1, &["p3", "p2"], true)));
        assert_eq!(state.next_page(true), Ok(2));

        let generation = state.begin();
        state.accept(generation, page(2, &["p1"], false));
        assert_eq!(state.next_page(true), Err(Skip::Exhausted));
        assert_eq!(
            state.posts().iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec!["p3", "p2", "p1"]
        );
    }

    #[test]
    fn test_sentinel_still_visible_after_in_flight_page() {
        let mut state = FeedState::new(FeedKey::default());
        state.note_sentinel(true);
        let generation = state.begin();

        // a hit during the fetch is skipped and no later event follows
        assert_eq!(state.next_page(true), Err(Skip::InFlight));
        assert!(!state.wants_more());

        state.accept(generation, page(1, &["p3", "p2"], true));
        assert!(state.wants_more());
        assert_eq!(state.next_page(true), Ok(2));

        state.note_sentinel(false);
        assert!(!state.wants_more());

        state.note_sentinel(true);
        let generation = state.begin();
        state.accept(generation, page(2, &["p1"], false));
        assert!(!state.wants_more());
    }

    #[test]
    fn test_superseded_response_dropped() {
        let mut state = FeedState::new(FeedKey::default());
        let stale = state.begin();
        state.set_key(FeedKey {
            sort: FeedSort::Top,
            filter: FeedFilter::All,
        });

        assert!(!state.accept(stale, page(1, &["old"], true)));
        assert!(state.posts().is_empty());
        assert_eq!(state.status(), &FetchStatus::Idle);
    }

    #[test]
    fn test_failure_keeps_pages() {
        let mut state = FeedState::new(FeedKey::default());
        let generation = state.begin();
        state.accept(generation, page(1, &["p2"], true));

        let generation = state.begin();
        state.fail(generation, "offline".to_string());
        assert_eq!(state.status(), &FetchStatus::Failed("offline".to_string()));
        assert_eq!(state.posts().len(), 1);
        assert_eq!(state.next_page(true), Ok(2));
    }

    #[test]
    fn test_refresh_drops_cached_pages() {
        let mut state = FeedState::new(FeedKey::default());
        let generation = state.begin();
        state.accept(generation, page(1, &["p2"], true));
        assert!(state.cached(1).is_some());

        state.refresh();
        assert!(state.cached(1).is_none());
        assert!(state.is_empty());
        assert_eq!(state.next_page(true), Ok(1));
    }

    #[test]
    fn test_is_new() {
        let latest = post("p9");
        assert!(!is_new(Some(&latest), Some("p9")));
        assert!(is_new(Some(&latest), Some("p8")));
        assert!(is_new(Some(&latest), None));
        assert!(!is_new(None, Some("p8")));
        assert!(!is_new(None, None));
    }
}
