//! Feed, post, comment and like endpoints

use async_trait::async_trait;
use reqwest::Method;

use super::{segment, ApiClient, ApiError, ApiResult};
use crate::feed::{FeedFilter, FeedKey, FeedSource};
use crate::models::{
    Comment, CommentUpdate, LikeStatus, NewComment, NewPost, Page, Post, PostUpdate,
};

impl ApiClient {
    /// `GET /feed` - one page of the feed for `key`
    pub async fn feed_page(&self, key: &FeedKey, page: u32, limit: u32) -> ApiResult<Page<Post>> {
        let builder = self.request(Method::GET, "/feed").await?.query(&[
            ("sort", key.sort.as_str().to_string()),
            ("filter", key.filter.as_str().to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ]);
        self.send_page(builder).await
    }

    /// `GET /feed/latest` - the single newest post, used for freshness polling
    pub async fn latest_post(&self, filter: FeedFilter) -> ApiResult<Option<Post>> {
        let builder = self
            .request(Method::GET, "/feed/latest")
            .await?
            .query(&[("filter", filter.as_str())]);
        self.send_data(builder).await
    }

    pub async fn create_post(&self, post: &NewPost) -> ApiResult<Post> {
        if post.body.trim().is_empty() && post.image_url.is_none() {
            return Err(ApiError::Api {
                status: 400,
                code: "VALIDATION_ERROR".to_string(),
                message: "A post needs text or an image".to_string(),
            });
        }
        self.post_data("/posts", post).await
    }

    pub async fn get_post(&self, id: &str) -> ApiResult<Post> {
        self.get_data(&format!("/posts/{}", segment(id))).await
    }

    pub async fn update_post(&self, id: &str, update: &PostUpdate) -> ApiResult<Post> {
        self.patch_data(&format!("/posts/{}", segment(id)), update).await
    }

    pub async fn delete_post(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("/posts/{}", segment(id))).await
    }

    pub async fn list_comments(&self, post_id: &str) -> ApiResult<Vec<Comment>> {
        self.get_data(&format!("/posts/{}/comments", segment(post_id)))
            .await
    }

    pub async fn add_comment(&self, post_id: &str, body: &str) -> ApiResult<Comment> {
        let payload = NewComment {
            body: body.to_string(),
        };
        self.post_data(&format!("/posts/{}/comments", segment(post_id)), &payload)
            .await
    }

    pub async fn update_comment(&self, comment_id: &str, body: &str) -> ApiResult<Comment> {
        let payload = CommentUpdate {
            body: body.to_string(),
        };
        self.patch_data(&format!("/comments/{}", segment(comment_id)), &payload)
            .await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        self.delete(&format!("/comments/{}", segment(comment_id)))
            .await
    }

    pub async fn like_post(&self, post_id: &str) -> ApiResult<LikeStatus> {
        let builder = self
            .request(Method::POST, &format!("/posts/{}/like", segment(post_id)))
            .await?;
        self.send_data(builder).await
    }

    pub async fn unlike_post(&self, post_id: &str) -> ApiResult<LikeStatus> {
        let builder = self
            .request(Method::DELETE, &format!("/posts/{}/like", segment(post_id)))
            .await?;
        self.send_data(builder).await
    }
}

#[async_trait]
impl FeedSource for ApiClient {
    type Error = ApiError;

    async fn fetch_page(&self, key: &FeedKey, page: u32, limit: u32) -> ApiResult<Page<Post>> {
        self.feed_page(key, page, limit).await
    }

    async fn fetch_newest(&self, filter: FeedFilter) -> ApiResult<Option<Post>> {
        self.latest_post(filter).await
    }
}
