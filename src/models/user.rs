//! User profiles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Full user profile as returned by `/profile` and `/users/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

impl User {
    /// Name to show in listings: display name when set, username otherwise
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Author reference embedded in posts, comments and reviews
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserSummary {
    pub fn shown_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shown_name_prefers_display_name() {
        let mut user = UserSummary {
            id: "u1".to_string(),
            username: "maduro_mike".to_string(),
            display_name: Some("Mike".to_string()),
            avatar_url: None,
        };
        assert_eq!(user.shown_name(), "Mike");

        user.display_name = None;
        assert_eq!(user.shown_name(), "maduro_mike");
    }

    #[test]
    fn test_profile_defaults_missing_counts() {
        let json = r#"{"id":"u1","username":"a","joined_at":"2024-01-01T00:00:00Z"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.follower_count, 0);
        assert_eq!(user.post_count, 0);
        assert!(user.bio.is_none());
    }
}
