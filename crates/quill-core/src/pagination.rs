//! Page arithmetic for post listings.
//!
//! Resolution never fails: a missing or non-numeric page is page 1, a number outside
//! the valid range is the last page.

use std::num::IntErrorKind;

use serde::Serialize;

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: u64 = 3;

/// Splits `total` items into fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(total: u64, per_page: u64) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages; an empty listing still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    /// Turn a raw `page` query value into a valid 1-based page number.
    pub fn resolve(&self, raw: Option<&str>) -> u64 {
        let Some(raw) = raw else {
            return 1;
        };
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 1 && (n as u64) <= self.num_pages() => n as u64,
            Ok(_) => self.num_pages(),
            // Still a whole number, just out of range.
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                self.num_pages()
            }
            Err(_) => 1,
        }
    }

    pub fn offset(&self, number: u64) -> u64 {
        number.saturating_sub(1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// Wrap the items fetched for page `number`.
    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number,
            num_pages: self.num_pages(),
            total: self.total,
            per_page: self.per_page,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_number(&self) -> Option<u64> {
        self.has_next().then(|| self.number + 1)
    }

    pub fn previous_number(&self) -> Option<u64> {
        self.has_previous().then(|| self.number - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}
