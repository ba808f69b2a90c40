//! Limit/offset pagination for article listings.

pub mod page;

pub use page::{PageRequest, PaginatedResult};
