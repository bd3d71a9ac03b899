//! Page requests and page results for list operations.
//!
//! List operations hand the request straight to storage, which applies
//! ordering, offset and limit. Services stay unaware of how pages are
//! presented.

use serde::{Deserialize, Serialize};

/// Requested page of a list operation. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Page size used when the caller does not specify one.
    pub const DEFAULT_PAGE_SIZE: u32 = 25;

    /// Largest accepted page size.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Creates a page request, clamping out-of-range values.
    ///
    /// Page `0` becomes `1`; page sizes are clamped to
    /// `1..=`[`Self::MAX_PAGE_SIZE`].
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        let clamped_page = if page == 0 { 1 } else { page };
        let clamped_size = if page_size == 0 {
            1
        } else if page_size > Self::MAX_PAGE_SIZE {
            Self::MAX_PAGE_SIZE
        } else {
            page_size
        };
        Self {
            page: clamped_page,
            page_size: clamped_size,
        }
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(self) -> u32 {
        self.page_size
    }

    /// Returns the number of rows to skip.
    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Returns the maximum number of rows to return.
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.page_size as u64
    }

    /// Slices an already ordered collection. Used by in-memory adapters.
    #[must_use]
    pub fn slice<T: Clone>(self, ordered: &[T]) -> Page<T> {
        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        let items = ordered.iter().skip(skip).take(take).cloned().collect();
        Page::new(items, ordered.len() as u64, self)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    page: u32,
    page_size: u32,
}

impl<T> Page<T> {
    /// Creates a page from its rows and the request that produced it.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }

    /// Returns the rows of this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page and returns its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the total number of matching rows across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Transforms every row, keeping paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
