//! Feed engine
//!
//! Infinite-scroll pagination over a cached page source, plus polling for
//! posts newer than the ones on screen.
//!
//! - `FeedPager`: appends pages as the end-of-feed sentinel comes into view
//! - `FreshnessPoller`: raises a "new posts" flag, never merges
//! - `QueryCache`: per-page cache with in-flight deduplication
//! - `FeedController`: the three above behind one handle

pub mod cache;
pub mod controller;
pub mod freshness;
pub mod key;
pub mod pager;
pub mod source;

pub use cache::{QueryCache, Retryable, DEFAULT_RETRIES};
pub use controller::{FeedController, FeedSettings, DEFAULT_PAGE_SIZE, DEFAULT_POLL_INTERVAL};
pub use freshness::{FreshnessPoller, PollOutcome};
pub use key::{FeedFilter, FeedKey, FeedSort, PageKey};
pub use pager::{FeedPager, FetchStatus, LoadOutcome, SkipReason};
pub use source::FeedSource;
