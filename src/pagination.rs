//! Page/limit/sort inputs and the computed page metadata.
//!
//! Query-string values arrive as raw strings; parsing is permissive with
//! named defaults so that junk input never reaches the store as NaN or a
//! negative offset.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Permissive parse: anything other than "asc" sorts descending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn to_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Validated page window. `page` is 1-based; `limit` is clamped to the
/// configured maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Build from raw query-string values, falling back to defaults on
    /// absent or non-numeric input.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let default_limit = crate::config::config().pagination.default_limit;
        Self::with_default_limit(page, limit, default_limit)
    }

    /// Same parse with a caller-chosen fallback limit. The configured
    /// maximum still applies.
    pub fn with_default_limit(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: i64,
    ) -> Self {
        let cfg = &crate::config::config().pagination;
        let page = page
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = limit
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(default_limit)
            .min(cfg.max_limit);
        Self { page, limit }
    }

    /// Saturates rather than overflowing; an astronomically large `page`
    /// yields an offset past any real table, not a panic.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination metadata emitted alongside every result page.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMeta {
    pub fn new(request: &PageRequest, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + request.limit - 1) / request.limit
        };
        Self {
            current_page: request.page,
            total_pages,
            total_items,
            items_per_page: request.limit,
            has_next_page: request.page < total_pages,
            has_previous_page: request.page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let req = PageRequest::from_raw(None, None);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn non_numeric_input_falls_back() {
        let req = PageRequest::from_raw(Some("banana"), Some("-3"));
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);
    }

    #[test]
    fn limit_is_clamped_to_configured_max() {
        let req = PageRequest::from_raw(Some("2"), Some("999999"));
        assert_eq!(req.page, 2);
        assert_eq!(req.limit, crate::config::config().pagination.max_limit);
    }

    #[test]
    fn offset_is_page_minus_one_times_limit() {
        let req = PageRequest::from_raw(Some("3"), Some("25"));
        assert_eq!(req.offset(), 50);
    }

    #[test]
    fn huge_page_values_saturate_instead_of_overflowing() {
        let req = PageRequest::from_raw(Some("9223372036854775807"), Some("10"));
        assert_eq!(req.page, i64::MAX);
        assert_eq!(req.offset(), i64::MAX);
    }

    #[test]
    fn caller_default_limit_applies_to_absent_and_junk_input() {
        assert_eq!(PageRequest::with_default_limit(None, None, 50).limit, 50);
        assert_eq!(PageRequest::with_default_limit(None, Some("abc"), 50).limit, 50);
        assert_eq!(PageRequest::with_default_limit(None, Some("20"), 50).limit, 20);
    }

    #[test]
    fn page_count_is_ceiling() {
        let req = PageRequest { page: 1, limit: 10 };
        assert_eq!(PageMeta::new(&req, 0).total_pages, 0);
        assert_eq!(PageMeta::new(&req, 1).total_pages, 1);
        assert_eq!(PageMeta::new(&req, 10).total_pages, 1);
        assert_eq!(PageMeta::new(&req, 11).total_pages, 2);
        assert_eq!(PageMeta::new(&req, 95).total_pages, 10);
    }

    #[test]
    fn next_and_previous_flags_at_edges() {
        let first = PageMeta::new(&PageRequest { page: 1, limit: 10 }, 35);
        assert!(first.has_next_page);
        assert!(!first.has_previous_page);

        let middle = PageMeta::new(&PageRequest { page: 2, limit: 10 }, 35);
        assert!(middle.has_next_page);
        assert!(middle.has_previous_page);

        let last = PageMeta::new(&PageRequest { page: 4, limit: 10 }, 35);
        assert!(!last.has_next_page);
        assert!(last.has_previous_page);
    }

    #[test]
    fn sort_order_parse_is_permissive() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }
}
