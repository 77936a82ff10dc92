//! State Management
//!
//! Global application state, the feed store and its freshness poller.

pub mod feed;
pub mod global;
pub mod polling;
pub mod wizard;

pub use feed::{provide_feed_store, use_feed, FeedFilter, FeedKey, FeedSort, FeedStore, FetchStatus};
pub use global::{provide_global_state, use_global, GlobalState};
pub use polling::use_freshness_polling;
pub use wizard::{Stopwatch, WizardDraft, WizardStep};
