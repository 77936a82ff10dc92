//! Profile and Upload Routes
//!
//! - GET /api/v1/profile - Signed-in user's profile
//! - GET /api/v1/users/:id - Any user's profile
//! - POST /api/v1/uploads - Multipart image upload (field `file`)
//! - GET /api/v1/uploads/:id - Uploaded image bytes

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::client::MAX_UPLOAD_BYTES;
use crate::mock::error::{MockError, MockResult};
use crate::mock::state::{MockState, Store, Upload};
use crate::models::{Envelope, UploadedImage, User};

/// User with follower and post counters filled in
fn render_user(store: &Store, user: &User) -> User {
    let mut user = user.clone();
    user.follower_count = store.follows.iter().filter(|(_, followee)| *followee == user.id).count() as u32;
    user.following_count = store.follows.iter().filter(|(follower, _)| *follower == user.id).count() as u32;
    user.post_count = store.posts.iter().filter(|p| p.author.id == user.id).count() as u32;
    user
}

/// GET /api/v1/profile
pub async fn own_profile(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> MockResult<Json<Envelope<User>>> {
    let store = state.store.read().await;
    let viewer = store.require_viewer(&headers)?;
    let user = render_user(&store, store.user(&viewer)?);
    Ok(Json(Envelope::new(user)))
}

/// GET /api/v1/users/:id
///
/// Accepts a user id or a username.
pub async fn user_profile(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> MockResult<Json<Envelope<User>>> {
    let store = state.store.read().await;
    let user = store
        .users
        .iter()
        .find(|u| u.id == id || u.username == id)
        .ok_or_else(|| MockError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(Envelope::new(render_user(&store, user))))
}

/// POST /api/v1/uploads
pub async fn upload_image(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> MockResult<(StatusCode, Json<Envelope<UploadedImage>>)> {
    state.store.read().await.require_viewer(&headers)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MockError::Validation(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !content_type.starts_with("image/") {
            return Err(MockError::Validation(format!(
                "Only images can be uploaded, got {}",
                content_type
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| MockError::Validation(format!("Malformed upload: {}", e)))?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(MockError::PayloadTooLarge(MAX_UPLOAD_BYTES));
        }

        let mut store = state.store.write().await;
        let id = store.next_id("img");
        store.uploads.insert(
            id.clone(),
            Upload {
                content_type,
                bytes: bytes.to_vec(),
            },
        );
        tracing::info!(upload_id = %id, size = bytes.len(), "Image uploaded");

        let url = format!("/api/v1/uploads/{}", id);
        return Ok((StatusCode::CREATED, Json(Envelope::new(UploadedImage { url }))));
    }

    Err(MockError::Validation("Missing multipart field 'file'".to_string()))
}

/// GET /api/v1/uploads/:id
pub async fn get_upload(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> MockResult<impl IntoResponse> {
    let store = state.store.read().await;
    let upload = store
        .uploads
        .get(&id)
        .ok_or_else(|| MockError::NotFound(format!("Upload {} not found", id)))?;

    Ok((
        [(header::CONTENT_TYPE, upload.content_type.clone())],
        upload.bytes.clone(),
    ))
}
