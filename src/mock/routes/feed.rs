//! Feed Routes
//!
//! - GET /api/v1/feed - One page of the feed
//! - GET /api/v1/feed/latest - The single newest post for a filter

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::feed::{FeedFilter, FeedSort};
use crate::mock::state::{MockState, Store};
use crate::models::{Envelope, Page, Post};

/// Largest page the stand-in will serve
pub const MAX_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub sort: FeedSort,
    #[serde(default)]
    pub filter: FeedFilter,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    #[serde(default)]
    pub filter: FeedFilter,
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_limit() -> u32 {
    10
}

/// Posts matching `filter` as seen by `viewer`, newest first
fn matching(store: &Store, filter: FeedFilter, viewer: Option<&str>) -> Vec<Post> {
    store
        .posts
        .iter()
        .filter(|post| match filter {
            FeedFilter::All => true,
            FeedFilter::Reviews => post.review_id.is_some(),
            FeedFilter::Following => viewer
                .map(|v| store.follows.contains(&(v.to_string(), post.author.id.clone())))
                .unwrap_or(false),
        })
        .map(|post| store.render_post(post, viewer))
        .collect()
}

/// GET /api/v1/feed
pub async fn feed_page(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<FeedQuery>,
) -> Json<Page<Post>> {
    let store = state.store.read().await;
    let viewer = store.viewer(&headers);
    let mut posts = matching(&store, query.filter, viewer.as_deref());

    if query.sort == FeedSort::Top {
        // stable sort keeps newest first among equal counts
        posts.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    }

    Json(Page::slice(&posts, query.page, query.limit.clamp(1, MAX_LIMIT)))
}

/// GET /api/v1/feed/latest
pub async fn latest_post(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<LatestQuery>,
) -> Json<Envelope<Option<Post>>> {
    let store = state.store.read().await;
    let viewer = store.viewer(&headers);
    let newest = matching(&store, query.filter, viewer.as_deref()).into_iter().next();
    Json(Envelope::new(newest))
}
