//! Response wrappers
//!
//! Success bodies are `{"data": ...}`, paged lists add `page` and `has_more`,
//! and failures carry `{"error": {"code", "message"}}`.

use serde::{Deserialize, Serialize};

/// Single-value success envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// One page of a paged listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// 1-based page number
    pub page: u32,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn empty(page: u32) -> Self {
        Self {
            data: Vec::new(),
            page,
            has_more: false,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Slice `items` into the requested 1-based page
    pub fn slice(items: &[T], page: u32, limit: u32) -> Self
    where
        T: Clone,
    {
        let page = page.max(1);
        let limit = limit.max(1) as usize;
        let start = (page as usize - 1) * limit;
        let data: Vec<T> = items.iter().skip(start).take(limit).cloned().collect();
        let has_more = start + data.len() < items.len();
        Self {
            data,
            page,
            has_more,
        }
    }
}

/// Error envelope returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Result of an image upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedImage {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_pages() {
        let items: Vec<u32> = (1..=25).collect();

        let first = Page::slice(&items, 1, 10);
        assert_eq!(first.data, (1..=10).collect::<Vec<_>>());
        assert!(first.has_more);

        let last = Page::slice(&items, 3, 10);
        assert_eq!(last.data, vec![21, 22, 23, 24, 25]);
        assert!(!last.has_more);

        let beyond = Page::slice(&items, 4, 10);
        assert!(beyond.is_empty());
        assert!(!beyond.has_more);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let items = vec!["a", "b"];
        let page = Page::slice(&items, 0, 1);
        assert_eq!(page.page, 1);
        assert_eq!(page.data, vec!["a"]);
        assert!(page.has_more);
    }
}
