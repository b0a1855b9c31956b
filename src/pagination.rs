//! This modules defines the common functionality for paging data.

use serde::Serialize;

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
}

/// A [PaginationConfig] that cannot serve a page request.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PaginationConfigError {
    /// A page size of zero would produce empty pages forever.
    #[error("the {0} must be at least 1")]
    ZeroPageSize(&'static str),

    /// Requests without a limit would get more items than requests with one may ask for.
    #[error("the default page size ({default}) is larger than the maximum page size ({max})")]
    DefaultAboveMaximum {
        /// The configured default page size.
        default: u64,
        /// The configured maximum page size.
        max: u64,
    },
}

impl PaginationConfig {
    /// Check that the page sizes are non-zero and the default does not exceed the maximum.
    ///
    /// # Errors
    /// Returns the first problem found with the config.
    pub fn validate(&self) -> Result<(), PaginationConfigError> {
        if self.default_page_size == 0 {
            return Err(PaginationConfigError::ZeroPageSize("default page size"));
        }

        if self.max_page_size == 0 {
            return Err(PaginationConfigError::ZeroPageSize("maximum page size"));
        }

        if self.default_page_size > self.max_page_size {
            return Err(PaginationConfigError::DefaultAboveMaximum {
                default: self.default_page_size,
                max: self.max_page_size,
            });
        }

        Ok(())
    }

    /// The page size used when a request does not give a limit.
    ///
    /// Always within `1..=max_page_size`, even for a config that fails [PaginationConfig::validate].
    pub fn default_limit(&self) -> u64 {
        self.default_page_size.clamp(1, self.max_page_size.max(1))
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// A validated request for one page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of items on the page.
    pub page_size: u64,
}

impl PageRequest {
    /// The number of items to skip to reach this page.
    ///
    /// Capped at `i64::MAX`, the largest offset SQLite accepts.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }
}

/// The pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u64,
}

impl Pagination {
    /// Describe the page `request` of a collection holding `total_items` items.
    ///
    /// A page size of zero gives zero pages.
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = match request.page_size {
            0 => 0,
            page_size => total_items.div_ceil(page_size),
        };

        Self {
            current_page: request.page,
            total_pages,
            total_items,
            items_per_page: request.page_size,
        }
    }
}
