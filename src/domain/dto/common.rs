//! Envelope and pagination shared by every endpoint.
//!
//! ```json
//! { "success": true, "data": [...], "pagination": { "page": 2, "limit": 10, "total": 25,
//!   "totalPages": 3, "hasNext": true, "hasPrev": true } }
//! ```

use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// `?page=&limit=&sort=&search=`, extracted next to the resource filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .filter(|l| *l > 0)
            .unwrap_or(PaginationConfig::DEFAULT_LIMIT)
            .min(PaginationConfig::MAX_LIMIT)
    }

    /// Clamped to `i64::MAX`, the largest skip MongoDB accepts
    pub fn skip(&self) -> u64 {
        (self.page() - 1)
            .saturating_mul(self.limit())
            .min(i64::MAX as u64)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// `sort=-createdAt` → `{ created_at: -1 }`. Fields outside `allowed`
    /// fall back to `default`.
    pub fn sort_document(&self, allowed: &[&str], default: Document) -> Document {
        let Some(raw) = self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return default;
        };

        let (field, direction) = match raw.strip_prefix('-') {
            Some(rest) => (rest, -1),
            None => (raw, 1),
        };
        let field = camel_to_snake(field);

        if allowed.contains(&field.as_str()) {
            doc! { field: direction }
        } else {
            default
        }
    }
}

fn camel_to_snake(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    pub fn from_query(query: &PageQuery, total: u64) -> Self {
        Self::new(query.page(), query.limit(), total)
    }
}

/// One page of results as returned by the repositories
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Success envelope. Errors use the body produced by `AppError`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn with_message(data: T, message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            ..Self::ok(data)
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn paginated(page: Page<T>) -> Self {
        Self {
            success: true,
            data: Some(page.items),
            message: None,
            pagination: Some(page.pagination),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
            pagination: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_second_page_of_25() {
        let p = Pagination::new(2, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(p.has_prev);

        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_next);

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next && !empty.has_prev);
    }

    #[test]
    fn test_pagination_wire_names() {
        let json = serde_json::to_value(Pagination::new(2, 10, 25)).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
    }

    #[test]
    fn test_page_query_defaults_and_caps() {
        let query = PageQuery::default();
        assert_eq!((query.page(), query.limit(), query.skip()), (1, 10, 0));

        let query = PageQuery { page: Some(3), limit: Some(500), ..Default::default() };
        assert_eq!(query.limit(), 100);
        assert_eq!(query.skip(), 200);

        let query = PageQuery { page: Some(0), limit: Some(0), ..Default::default() };
        assert_eq!((query.page(), query.limit()), (1, 10));
    }

    #[test]
    fn test_huge_page_number_does_not_overflow_skip() {
        let query = PageQuery { page: Some(u64::MAX), limit: Some(10), ..Default::default() };
        assert_eq!(query.skip(), i64::MAX as u64);

        let pagination = Pagination::from_query(&query, 25);
        assert!(!pagination.has_next);
        assert!(pagination.has_prev);
    }

    #[test]
    fn test_sort_document() {
        let default = doc! { "created_at": -1 };
        let query = PageQuery { sort: Some("-startDate".into()), ..Default::default() };
        assert_eq!(query.sort_document(&["start_date"], default.clone()), doc! { "start_date": -1 });

        let query = PageQuery { sort: Some("password_hash".into()), ..Default::default() };
        assert_eq!(query.sort_document(&["title"], default.clone()), default);
    }

    #[test]
    fn test_envelope_skips_empty_fields() {
        let json = serde_json::to_value(ApiResponse::message("تم")).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
        assert!(json.get("pagination").is_none());
    }
}
