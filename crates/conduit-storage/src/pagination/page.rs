//! Page request parsing and the paginated result envelope.

use conduit_core::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::Serialize;

/// A limit/offset window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    /// Build a page from raw query-string values.
    ///
    /// Missing, unparsable or negative values fall back to the defaults.
    /// A limit of 0 means the default; limits above the cap are clamped.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = match limit.and_then(|v| v.trim().parse::<i64>().ok()) {
            Some(n) if n > 0 => n.min(MAX_PAGE_LIMIT),
            _ => DEFAULT_PAGE_LIMIT,
        };
        let offset = match offset.and_then(|v| v.trim().parse::<i64>().ok()) {
            Some(n) if n >= 0 => n,
            _ => 0,
        };
        Self { limit, offset }
    }
}

/// A paginated result set. `total` counts every match, ignoring the window.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PaginatedResult<T> {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}
