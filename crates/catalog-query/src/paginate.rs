//! Fixed-size page windows over a sorted sequence.

use serde::Serialize;

use crate::error::{CatalogError, Result};

/// One window of matching, sorted records plus paging metadata.
///
/// `page` is reported as requested: a page past the end yields empty
/// `items` while `total_items` and `total_pages` still describe the whole
/// result. Use [`ResultPage::clamped_page`] to pick a page to navigate to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> ResultPage<T> {
    /// Returns `true` if this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if a later page holds items.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if an earlier page holds items.
    pub fn has_previous(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }

    /// The nearest page that holds items, or 1 when nothing matched.
    pub fn clamped_page(&self) -> usize {
        self.page.clamp(1, self.total_pages.max(1))
    }

    /// Transforms the items, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> ResultPage<U>
    where
        F: FnMut(T) -> U,
    {
        ResultPage {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Splits sequences into pages of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    /// Creates a paginator. The page size must be at least one.
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(CatalogError::InvalidPageSize(page_size));
        }
        Ok(Paginator { page_size })
    }

    /// Items per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages needed for `total_items`; zero for an empty result.
    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    /// Takes the window `[(page-1)*size, page*size)` clamped to the input.
    ///
    /// `page` values below 1 are read as 1. Never panics on a page past the
    /// end; the window is simply empty.
    pub fn paginate<T>(&self, records: Vec<T>, page: usize) -> ResultPage<T> {
        let page = page.max(1);
        let total_items = records.len();
        let start = (page - 1).saturating_mul(self.page_size).min(total_items);
        let end = start.saturating_add(self.page_size).min(total_items);

        let items = records.into_iter().skip(start).take(end - start).collect();

        ResultPage {
            items,
            page,
            page_size: self.page_size,
            total_items,
            total_pages: self.total_pages(total_items),
        }
    }
}
