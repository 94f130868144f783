//! Page-based pagination for list endpoints.
//!
//! Lists accept `page` (1-indexed, default 1, capped at [`MAX_PAGE`]) and
//! `page_size` (1-100, default 10) and answer with a [`Paginated`] body:
//!
//! ```json
//! { "list": [...], "total": 42, "page": 2, "page_size": 10, "has_more": true }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Pages past this are served as this page, keeping `OFFSET` well inside `i64`.
pub const MAX_PAGE: i64 = 1_000_000;

/// Deserializes an optional string into an optional i64.
///
/// Query strings arrive as text (also through `#[serde(flatten)]`), and empty
/// values such as `?page=` are treated as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) if s.is_empty() => Ok(None),
        Some(Raw::Text(s)) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip, for `OFFSET`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }

    /// Rows to return, for `LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.page_size()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub list: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub has_more: bool,
}

impl<T> Paginated<T> {
    pub fn new(list: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        let shown = i64::try_from(list.len()).unwrap_or(i64::MAX);
        let has_more = params.offset().saturating_add(shown) < total;
        Self {
            list,
            total,
            page: params.page(),
            page_size: params.page_size(),
            has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, page_size: Option<i64>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_offset_from_page() {
        let p = params(Some(3), Some(20));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let cases = [
            (Some(0), 1),
            (Some(-5), 1),
            (Some(1), 1),
            (Some(100), 100),
            (Some(101), 100),
            (None, 10),
        ];
        for (input, expected) in cases {
            assert_eq!(params(None, input).page_size(), expected);
        }
    }

    #[test]
    fn test_page_below_one_is_first_page() {
        let p = params(Some(-2), Some(10));
        assert_eq!(p.page(), 1);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let p = params(Some(i64::MAX), Some(MAX_PAGE_SIZE));
        assert_eq!(p.page(), MAX_PAGE);
        assert_eq!(p.offset(), (MAX_PAGE - 1) * MAX_PAGE_SIZE);

        let page = Paginated::<i32>::new(vec![], 3, &p);
        assert!(!page.has_more);
        assert_eq!(page.page, MAX_PAGE);
    }

    #[test]
    fn test_deserialize_query_strings() {
        let json = r#"{"page":"2","page_size":"25"}"#;
        let p: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.page(), 2);
        assert_eq!(p.page_size(), 25);
    }

    #[test]
    fn test_deserialize_empty_and_missing() {
        let p: PaginationParams = serde_json::from_str(r#"{"page":""}"#).unwrap();
        assert_eq!(p.page(), 1);
        let p: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.page_size(), 10);
    }

    #[test]
    fn test_deserialize_rejects_text() {
        let result: Result<PaginationParams, _> = serde_json::from_str(r#"{"page":"two"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_paginated_has_more() {
        let p = params(Some(1), Some(2));
        let page = Paginated::new(vec![1, 2], 5, &p);
        assert!(page.has_more);

        let p = params(Some(3), Some(2));
        let page = Paginated::new(vec![5], 5, &p);
        assert!(!page.has_more);
        assert_eq!(page.page, 3);
    }
}
