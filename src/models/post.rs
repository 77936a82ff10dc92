//! Social feed records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserSummary;

/// A post in the social feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub author: UserSummary,
    pub body: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Review attached to this post, if the post shares one
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub liked_by_me: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /posts`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<String>,
}

impl NewPost {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    /// Builder method: attach an uploaded image
    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder method: share a review
    pub fn review(mut self, review_id: impl Into<String>) -> Self {
        self.review_id = Some(review_id.into());
        self
    }
}

/// Payload for `PATCH /posts/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// A comment under a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author: UserSummary,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentUpdate {
    pub body: String,
}

/// Result of liking or unliking a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LikeStatus {
    pub post_id: String,
    pub liked: bool,
    pub like_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_skips_empty_fields() {
        let json = serde_json::to_value(NewPost::new("Lit a Padron 1964")).unwrap();
        assert_eq!(json, serde_json::json!({ "body": "Lit a Padron 1964" }));

        let json = serde_json::to_value(NewPost::new("x").review("r9")).unwrap();
        assert_eq!(json["review_id"], "r9");
    }

    #[test]
    fn test_post_decodes_with_defaults() {
        let json = r#"{
            "id": "p1",
            "author": {"id": "u1", "username": "ash"},
            "body": "hello",
            "created_at": "2024-05-01T12:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.like_count, 0);
        assert!(!post.liked_by_me);
        assert!(post.review_id.is_none());
    }
}
