//! Review Routes
//!
//! - GET /api/v1/reviews - Paged reviews, optionally by one author
//! - POST /api/v1/reviews - Create a review
//! - GET /api/v1/reviews/:id - Get a review
//! - PATCH /api/v1/reviews/:id - Update own review
//! - DELETE /api/v1/reviews/:id - Delete own review

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use super::feed::{default_limit, default_page, MAX_LIMIT};
use crate::mock::error::{MockError, MockResult};
use crate::mock::state::MockState;
use crate::models::{Envelope, NewReview, Page, Review, ReviewUpdate};
use crate::review::{DETAIL_RATING_RANGE, RATING_RANGE};

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    pub author: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn check_rating(field: &str, value: u8, (min, max): (u8, u8)) -> MockResult<()> {
    if value < min || value > max {
        return Err(MockError::Validation(format!(
            "{} must be between {} and {}",
            field, min, max
        )));
    }
    Ok(())
}

fn validate(review: &NewReview) -> MockResult<()> {
    if review.cigar_name.trim().is_empty() {
        return Err(MockError::Validation("Cigar name is required".to_string()));
    }
    check_rating("rating", review.rating, RATING_RANGE)?;
    for (field, value) in [
        ("draw_rating", review.draw_rating),
        ("burn_rating", review.burn_rating),
        ("construction_rating", review.construction_rating),
    ] {
        if let Some(value) = value {
            check_rating(field, value, DETAIL_RATING_RANGE)?;
        }
    }
    Ok(())
}

/// GET /api/v1/reviews
pub async fn list_reviews(
    State(state): State<Arc<MockState>>,
    Query(query): Query<ReviewQuery>,
) -> Json<Page<Review>> {
    let store = state.store.read().await;
    let reviews: Vec<Review> = store
        .reviews
        .iter()
        .filter(|r| query.author.as_deref().map_or(true, |a| r.author.id == a))
        .cloned()
        .collect();

    Json(Page::slice(&reviews, query.page, query.limit.clamp(1, MAX_LIMIT)))
}

/// POST /api/v1/reviews
pub async fn create_review(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(req): Json<NewReview>,
) -> MockResult<(StatusCode, Json<Envelope<Review>>)> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    validate(&req)?;

    let review = Review {
        id: store.next_id("r"),
        author: store.summary(&viewer)?,
        cigar_id: req.cigar_id,
        cigar_name: req.cigar_name.trim().to_string(),
        vitola: req.vitola,
        rating: req.rating,
        draw_rating: req.draw_rating,
        burn_rating: req.burn_rating,
        construction_rating: req.construction_rating,
        flavor_notes: req.flavor_notes,
        notes: req.notes,
        smoke_duration_secs: req.smoke_duration_secs,
        image_url: req.image_url,
        created_at: Utc::now(),
    };
    store.reviews.insert(0, review.clone());
    tracing::info!(review_id = %review.id, rating = review.rating, "Review created");

    Ok((StatusCode::CREATED, Json(Envelope::new(review))))
}

/// GET /api/v1/reviews/:id
pub async fn get_review(
    State(state): State<Arc<MockState>>,
    Path(id): Path<String>,
) -> MockResult<Json<Envelope<Review>>> {
    let store = state.store.read().await;
    Ok(Json(Envelope::new(store.review(&id)?.clone())))
}

/// PATCH /api/v1/reviews/:id
pub async fn update_review(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<ReviewUpdate>,
) -> MockResult<Json<Envelope<Review>>> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    if store.review(&id)?.author.id != viewer {
        return Err(MockError::Forbidden("Only the author can edit a review".to_string()));
    }
    if let Some(rating) = req.rating {
        check_rating("rating", rating, RATING_RANGE)?;
    }

    let review = store
        .reviews
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| MockError::NotFound(format!("Review {} not found", id)))?;
    if let Some(rating) = req.rating {
        review.rating = rating;
    }
    if let Some(notes) = req.notes {
        review.notes = Some(notes).filter(|n| !n.is_empty());
    }
    if let Some(flavor_notes) = req.flavor_notes {
        review.flavor_notes = flavor_notes;
    }

    Ok(Json(Envelope::new(review.clone())))
}

/// DELETE /api/v1/reviews/:id
pub async fn delete_review(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    let mut store = state.store.write().await;
    let viewer = store.require_viewer(&headers)?;
    if store.review(&id)?.author.id != viewer {
        return Err(MockError::Forbidden("Only the author can delete a review".to_string()));
    }

    store.reviews.retain(|r| r.id != id);
    // posts sharing it stay up without the attachment
    for post in store.posts.iter_mut().filter(|p| p.review_id.as_deref() == Some(id.as_str())) {
        post.review_id = None;
    }
    Ok(StatusCode::NO_CONTENT)
}
