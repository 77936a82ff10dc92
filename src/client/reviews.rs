//! Review endpoints

use reqwest::Method;

use super::{segment, ApiClient, ApiError, ApiResult};
use crate::models::{NewReview, Page, Review, ReviewUpdate};

/// Highest overall score a review may carry
pub const MAX_RATING: u8 = 100;

impl ApiClient {
    /// `GET /reviews`, optionally restricted to one author
    pub async fn list_reviews(
        &self,
        author: Option<&str>,
        page: u32,
        limit: u32,
    ) -> ApiResult<Page<Review>> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(author) = author {
            query.push(("author", author.to_string()));
        }

        let builder = self.request(Method::GET, "/reviews").await?.query(&query);
        self.send_page(builder).await
    }

    pub async fn create_review(&self, review: &NewReview) -> ApiResult<Review> {
        if review.rating > MAX_RATING {
            return Err(ApiError::Api {
                status: 400,
                code: "VALIDATION_ERROR".to_string(),
                message: format!("Rating must be between 0 and {}", MAX_RATING),
            });
        }
        self.post_data("/reviews", review).await
    }

    pub async fn get_review(&self, id: &str) -> ApiResult<Review> {
        self.get_data(&format!("/reviews/{}", segment(id))).await
    }

    pub async fn update_review(&self, id: &str, update: &ReviewUpdate) -> ApiResult<Review> {
        self.patch_data(&format!("/reviews/{}", segment(id)), update)
            .await
    }

    pub async fn delete_review(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/reviews/{}", segment(id))).await
    }
}
