//! Page requests and paginated envelopes shared by every list endpoint.

use serde::Serialize;

use crate::config::PaginationConfig;

/// A normalized page request: `page` is 1-based, `per_page` is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Normalize raw query values.
    ///
    /// A missing or non-positive `page` becomes 1. A missing `per_page` takes the
    /// configured default; any value is clamped to `1..=max_per_page`.
    pub fn new(page: Option<i64>, per_page: Option<i64>, limits: PaginationConfig) -> Self {
        let max = limits.max_per_page.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(limits.default_per_page).clamp(1, max),
        }
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// List envelope: `{data, total, current_page, per_page, last_page}`.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub last_page: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            data,
            total,
            current_page: request.page,
            per_page: request.per_page,
            last_page: last_page(total, request.per_page),
        }
    }
}

/// Number of the last page; an empty result still has page 1.
pub fn last_page(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 1;
    }
    (total + per_page - 1) / per_page
}
