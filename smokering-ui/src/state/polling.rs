//! Freshness Polling
//!
//! Periodically asks the server for the newest post so the feed can show a
//! "new posts" banner. Nothing is merged automatically.

use gloo_timers::callback::Interval;
use leptos::*;

use super::feed::FeedStore;

/// Seconds between freshness checks
pub const POLL_INTERVAL_SECS: u32 = 30;

/// Start polling for the lifetime of the calling component
pub fn use_freshness_polling(feed: FeedStore) {
    let interval = Interval::new(POLL_INTERVAL_SECS * 1000, move || {
        // a failed page leaves nothing to compare against
        if feed.state.with_untracked(|s| !s.is_empty()) {
            feed.poll();
        }
    });

    let handle = store_value(Some(interval));
    on_cleanup(move || {
        // dropping the Interval cancels it
        handle.update_value(|h| {
            h.take();
        });
    });
}
