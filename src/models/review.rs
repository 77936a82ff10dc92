//! Cigar reviews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserSummary;

/// Tasting notes split by the thirds of the smoke
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FlavorNotes {
    #[serde(default)]
    pub first_third: Vec<String>,
    #[serde(default)]
    pub second_third: Vec<String>,
    #[serde(default)]
    pub final_third: Vec<String>,
}

impl FlavorNotes {
    pub fn is_empty(&self) -> bool {
        self.first_third.is_empty() && self.second_third.is_empty() && self.final_third.is_empty()
    }

    /// Every note across the thirds, in order, without repeats
    pub fn distinct(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for note in self
            .first_third
            .iter()
            .chain(&self.second_third)
            .chain(&self.final_third)
        {
            if !seen.contains(&note.as_str()) {
                seen.push(note);
            }
        }
        seen
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub author: UserSummary,
    #[serde(default)]
    pub cigar_id: Option<String>,
    pub cigar_name: String,
    #[serde(default)]
    pub vitola: Option<String>,
    /// Overall score, 0-100
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

/// Payload for `POST /reviews`, normally produced by the review wizard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cigar_id: Option<String>,
    pub cigar_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitola: Option<String>,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burn_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction_rating: Option<u8>,
    #[serde(default)]
    pub flavor_notes: FlavorNotes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoke_duration_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor_notes: Option<FlavorNotes>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_notes_distinct_keeps_order() {
        let notes = FlavorNotes {
            first_third: vec!["cedar".into(), "pepper".into()],
            second_third: vec!["cocoa".into(), "cedar".into()],
            final_third: vec!["leather".into()],
        };
        assert_eq!(notes.distinct(), vec!["cedar", "pepper", "cocoa", "leather"]);
        assert!(!notes.is_empty());
        assert!(FlavorNotes::default().is_empty());
    }
}
