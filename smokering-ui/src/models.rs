//! Server Records
//!
//! Wire shapes of the backend REST API, as consumed by the front-end.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserSummary {
    pub fn shown_name(&self) -> String {
        self.display_name.clone().unwrap_or_else(|| self.username.clone())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub follower_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub post_count: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub author: UserSummary,
    pub body: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub review_id: Option<String>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub comment_count: u32,
    #[serde(default)]
    pub liked_by_me: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author: UserSummary,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LikeStatus {
    pub post_id: String,
    pub liked: bool,
    pub like_count: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Humidor {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub target_humidity: Option<u8>,
    #[serde(default)]
    pub cigar_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Cigar {
    pub id: String,
    pub humidor_id: String,
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub vitola: Option<String>,
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price_cents: Option<u32>,
    #[serde(default)]
    pub acquired_on: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct FlavorNotes {
    #[serde(default)]
    pub first_third: Vec<String>,
    #[serde(default)]
    pub second_third: Vec<String>,
    #[serde(default)]
    pub final_third: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub author: UserSummary,
    pub cigar_name: String,
    #[serde(default)]
    pub vitola: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub draw_rating: Option<u8>,
    #[serde(default)]
    pub burn_rating: Option<u8>,
    #[serde(default)]
    pub construction_rating: Option<u8>,
    #[serde(default)]
    pub flavor_notes: FlavorNotes,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub smoke_duration_secs: Option<u64>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct NewReview {
    pub cigar_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitola: Option<String>,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burn_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub construction_rating: Option<u8>,
    pub flavor_notes: FlavorNotes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoke_duration_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One page of a paged listing
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Signed-in session as reported by the identity provider
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    pub access_token: String,
    pub expires: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SessionUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
