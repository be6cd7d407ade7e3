//! Pagination contract
//!
//! Every list endpoint shares the same page/limit parsing and response
//! envelope: `{items, page, limit, total, pages}` with
//! `pages = ceil(total / limit)`.

use serde::{Deserialize, Serialize};

/// Default page size for resource listings
pub const DEFAULT_RESOURCE_LIMIT: u32 = 20;
/// Default page size for rating listings
pub const DEFAULT_RATING_LIMIT: u32 = 10;
/// Hard ceiling on any requested page size
pub const MAX_LIMIT: u32 = 100;

/// Normalized page/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl PageParams {
    /// Clamp raw query values into a valid pair: `page >= 1`,
    /// `1 <= limit <= MAX_LIMIT`, falling back to `default_limit`.
    pub fn clamp(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// Number of records to skip: `(page - 1) * limit`
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    /// Build a page from one slice of results plus the total match count
    pub fn new(items: Vec<T>, params: PageParams, total: u64) -> Self {
        Self {
            items,
            page: params.page,
            limit: params.limit,
            total,
            pages: total.div_ceil(u64::from(params.limit)),
        }
    }

    /// An empty page for a filter that cannot match anything
    pub fn empty(params: PageParams) -> Self {
        Self::new(Vec::new(), params, 0)
    }

    /// Map the item type, keeping the envelope
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_defaults_and_bounds() {
        let p = PageParams::clamp(None, None, DEFAULT_RESOURCE_LIMIT);
        assert_eq!(p, PageParams { page: 1, limit: 20 });

        let p = PageParams::clamp(Some(0), Some(0), 10);
        assert_eq!(p, PageParams { page: 1, limit: 1 });

        let p = PageParams::clamp(Some(3), Some(500), 10);
        assert_eq!(p, PageParams { page: 3, limit: MAX_LIMIT });
    }

    #[test]
    fn skip_is_offset_of_page_start() {
        assert_eq!(PageParams { page: 1, limit: 20 }.skip(), 0);
        assert_eq!(PageParams { page: 2, limit: 10 }.skip(), 10);
        assert_eq!(PageParams { page: 7, limit: 25 }.skip(), 150);
    }

    #[test]
    fn pages_is_ceiling_of_total_over_limit() {
        let params = PageParams { page: 1, limit: 10 };
        assert_eq!(Page::new(vec![1, 2, 3], params, 15).pages, 2);
        assert_eq!(Page::new(vec![1], params, 10).pages, 1);
        assert_eq!(Page::<u32>::empty(params).pages, 0);
    }
}
