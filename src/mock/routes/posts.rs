//! Post, Comment and Like Routes
//!
//! - POST /api/v1/posts - Create a post
//! - GET /api/v1/posts/:id - Get a post
//! - PATCH /api/v1/posts/:id - Edit own post
//! - DELETE /api/v1/posts/:id - Delete own post
//! - GET /api/v1/posts/:id/comments - Comments, oldest first
//! - POST /api/v1/posts/:id/comments - Add a comment
//! - PATCH /api/v1/comments/:id - Edit own comment
//! - DELETE /api/v1/comments/:id - Delete own comment
//! - POST /api/v1/posts/:id/like - Like
//! - DELETE /api/v1/posts/:id/like - Unlike

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::mock::error::{MockError, MockResult};
use crate::mock::state::{MockState, Store};
use crate::models::{
    Comment, CommentUpdate, Envelope, LikeStatus, NewComment, NewPost, Post, PostUpdate,
};

/// Longest post or comment body accepted
pub const MAX_BODY_CHARS: usize = 2000;

fn check_body(body: &str, allow_empty: bool) -> MockResult<()> {
    if !allow_empty && body.trim().is_empty() {
        return Err(MockError::Validation("Text cannot be empty".to_string()));
    }
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(MockError::Validation(format!(
            "Text is limited to {} characters",
            MAX_BODY_CHARS
        )));
    }
    Ok(())
}

fn post_index(store: &Store, id: &str) -> MockResult<usize> {
    store
        .posts
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| MockError::NotFound(format!("Post {} not found", id)))
}

fn comment_index(store: &Store, id: &str) -> MockResult<usize> {
    store
        .comments
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| MockError::NotFound(format!("Comment {} not found", id)))
}

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(req): Json<NewPost>,
) -> MockResult<(StatusCode, Json<Envelope<Post>>)> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;

    if req.body.trim().is_empty() && req.image_url.is_none() {
        return Err(MockError::Validation("A post needs text or an image".to_string()));
    }
    check_body(&req.body, true)?;
    if let Some(review_id) = &req.review_id {
        store.review(review_id)?;
    }

    let post = Post {
        id: store.next_id("p"),
        author: store.summary(&viewer)?,
        body: req.body.trim().to_string(),
        image_url: req.image_url,
        review_id: req.review_id,
        like_count: 0,
        comment_count: 0,
        liked_by_me: false,
        created_at: Utc::now(),
        updated_at: None,
    };
    store.posts.insert(0, post.clone());
    tracing::info!(post_id = %post.id, author = %viewer, "Post created");

    Ok((StatusCode::CREATED, Json(Envelope::new(post))))
}

/// GET /api/v1/posts/:id
pub async fn get_post(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> MockResult<Json<Envelope<Post>>> {
    let store = state.store.read().await;
    let viewer = store.viewer(&headers);
    let post = store.render_post(store.post(&id)?, viewer.as_deref());
    Ok(Json(Envelope::new(post)))
}

/// PATCH /api/v1/posts/:id
pub async fn update_post(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<PostUpdate>,
) -> MockResult<Json<Envelope<Post>>> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    let idx = post_index(&store, &id)?;
    if store.posts[idx].author.id != viewer {
        return Err(MockError::Forbidden("Only the author can edit a post".to_string()));
    }

    if let Some(body) = &req.body {
        check_body(body, store.posts[idx].image_url.is_some())?;
    }

    let post = &mut store.posts[idx];
    if let Some(body) = req.body {
        post.body = body.trim().to_string();
    }
    if let Some(image_url) = req.image_url {
        post.image_url = Some(image_url).filter(|u| !u.is_empty());
    }
    post.updated_at = Some(Utc::now());

    let post = post.clone();
    Ok(Json(Envelope::new(store.render_post(&post, Some(&viewer)))))
}

/// DELETE /api/v1/posts/:id
pub async fn delete_post(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    let idx = post_index(&store, &id)?;
    if store.posts[idx].author.id != viewer {
        return Err(MockError::Forbidden("Only the author can delete a post".to_string()));
    }

    store.posts.remove(idx);
    store.comments.retain(|c| c.post_id != id);
    store.likes.retain(|(post_id, _)| *post_id != id);
    tracing::info!(post_id = %id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/posts/:id/comments
pub async fn list_comments(
    State(state): State<Arc<MockState>>,
    Path(post_id): Path<String>,
) -> MockResult<Json<Envelope<Vec<Comment>>>> {
    let store = state.store.read().await;
    store.post(&post_id)?;

    let mut comments: Vec<Comment> = store
        .comments
        .iter()
        .filter(|c| c.post_id == post_id)
        .cloned()
        .collect();
    comments.sort_by_key(|c| c.created_at);

    Ok(Json(Envelope::new(comments)))
}

/// POST /api/v1/posts/:id/comments
pub async fn add_comment(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Json(req): Json<NewComment>,
) -> MockResult<(StatusCode, Json<Envelope<Comment>>)> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    store.post(&post_id)?;
    check_body(&req.body, false)?;

    let comment = Comment {
        id: store.next_id("c"),
        post_id,
        author: store.summary(&viewer)?,
        body: req.body.trim().to_string(),
        created_at: Utc::now(),
    };
    store.comments.push(comment.clone());

    Ok((StatusCode::CREATED, Json(Envelope::new(comment))))
}

/// PATCH /api/v1/comments/:id
pub async fn update_comment(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<CommentUpdate>,
) -> MockResult<Json<Envelope<Comment>>> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    let idx = comment_index(&store, &id)?;
    if store.comments[idx].author.id != viewer {
        return Err(MockError::Forbidden("Only the author can edit a comment".to_string()));
    }
    check_body(&req.body, false)?;

    let comment = &mut store.comments[idx];
    comment.body = req.body.trim().to_string();
    Ok(Json(Envelope::new(comment.clone())))
}

/// DELETE /api/v1/comments/:id
pub async fn delete_comment(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    let idx = comment_index(&store, &id)?;

    // post authors may remove comments under their posts
    let comment = &store.comments[idx];
    let post_author = store.post(&comment.post_id).map(|p| p.author.id.clone()).ok();
    if comment.author.id != viewer && post_author.as_deref() != Some(viewer.as_str()) {
        return Err(MockError::Forbidden("Not allowed to delete this comment".to_string()));
    }

    store.comments.remove(idx);
    Ok(StatusCode::NO_CONTENT)
}

fn like_status(store: &Store, post_id: &str, viewer: &str) -> LikeStatus {
    LikeStatus {
        post_id: post_id.to_string(),
        liked: store.likes.contains(&(post_id.to_string(), viewer.to_string())),
        like_count: store.likes.iter().filter(|(p, _)| p == post_id).count() as u32,
    }
}

/// POST /api/v1/posts/:id/like
pub async fn like_post(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> MockResult<Json<Envelope<LikeStatus>>> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    store.post(&post_id)?;

    store.likes.insert((post_id.clone(), viewer.clone()));
    Ok(Json(Envelope::new(like_status(&store, &post_id, &viewer))))
}

/// DELETE /api/v1/posts/:id/like
pub async fn unlike_post(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> MockResult<Json<Envelope<LikeStatus>>> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    store.post(&post_id)?;

    store.likes.remove(&(post_id.clone(), viewer.clone()));
    Ok(Json(Envelope::new(like_status(&store, &post_id, &viewer))))
}
