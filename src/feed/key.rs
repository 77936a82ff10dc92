//! Feed cache keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feed ordering
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedSort {
    /// Reverse chronological
    #[default]
    Newest,
    /// Ranked by engagement
    Top,
}

impl FeedSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSort::Newest => "newest",
            FeedSort::Top => "top",
        }
    }
}

/// Which posts the feed includes
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeedFilter {
    #[default]
    All,
    /// Only authors the user follows
    Following,
    /// Only posts sharing a review
    Reviews,
}

impl FeedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedFilter::All => "all",
            FeedFilter::Following => "following",
            FeedFilter::Reviews => "reviews",
        }
    }
}

impl FromStr for FeedSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "new" | "latest" => Ok(FeedSort::Newest),
            "top" | "ranked" => Ok(FeedSort::Top),
            other => Err(format!("unknown feed sort: {}", other)),
        }
    }
}

impl FromStr for FeedFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FeedFilter::All),
            "following" => Ok(FeedFilter::Following),
            "reviews" => Ok(FeedFilter::Reviews),
            other => Err(format!("unknown feed filter: {}", other)),
        }
    }
}

/// Identifies one feed listing; pages are cached per key
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FeedKey {
    pub sort: FeedSort,
    pub filter: FeedFilter,
}

impl FeedKey {
    pub fn new(sort: FeedSort, filter: FeedFilter) -> Self {
        Self { sort, filter }
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.sort.as_str(), self.filter.as_str())
    }
}

/// Cache key of a single feed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub feed: FeedKey,
    pub page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("latest".parse::<FeedSort>().unwrap(), FeedSort::Newest);
        assert_eq!("TOP".parse::<FeedSort>().unwrap(), FeedSort::Top);
        assert_eq!("Reviews".parse::<FeedFilter>().unwrap(), FeedFilter::Reviews);
        assert!("hot".parse::<FeedSort>().is_err());
    }

    #[test]
    fn test_key_display() {
        let key = FeedKey::new(FeedSort::Top, FeedFilter::Following);
        assert_eq!(key.to_string(), "top/following");
        assert_eq!(FeedKey::default().to_string(), "newest/all");
    }
}
