//! Limit/offset windows.

use serde::{Deserialize, Serialize};

/// `limit`/`offset` window. `None` means "no limit" / "no offset".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PagingOptions {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl PagingOptions {
    #[must_use]
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self { limit, offset }
    }

    #[must_use]
    pub fn limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Maps page numbers to [`PagingOptions`] for a fixed page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageResolver {
    page_size: u64,
    start_page: u64,
}

impl PageResolver {
    #[must_use]
    pub fn new(page_size: u64, start_page: u64) -> Self {
        Self {
            page_size,
            start_page,
        }
    }

    #[must_use]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Window for page `page`. Pages before `start_page` resolve to the first page.
    #[must_use]
    pub fn page(&self, page: u64) -> PagingOptions {
        let index = page.saturating_sub(self.start_page);
        PagingOptions {
            limit: Some(self.page_size),
            offset: Some(index.saturating_mul(self.page_size)),
        }
    }
}

/// One-based pages of 20 items.
impl Default for PageResolver {
    fn default() -> Self {
        Self::new(20, 1)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn one_based_pages() {
        let r = PageResolver::new(3, 1);
        assert_eq!(r.page(1), PagingOptions::new(Some(3), Some(0)));
        assert_eq!(r.page(2), PagingOptions::new(Some(3), Some(3)));
        assert_eq!(r.page(5), PagingOptions::new(Some(3), Some(12)));
    }

    #[test]
    fn zero_based_pages() {
        let r = PageResolver::new(10, 0);
        assert_eq!(r.page(0).offset, Some(0));
        assert_eq!(r.page(3).offset, Some(30));
    }

    #[test]
    fn pages_before_start_saturate() {
        let r = PageResolver::new(10, 1);
        assert_eq!(r.page(0), r.page(1));
    }

    #[test]
    fn builders() {
        assert_eq!(
            PagingOptions::limit(2).with_offset(1),
            PagingOptions::new(Some(2), Some(1))
        );
        assert_eq!(PagingOptions::default(), PagingOptions::new(None, None));
        assert_eq!(PageResolver::default().page_size(), 20);
    }
}
