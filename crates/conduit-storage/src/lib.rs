//! conduit-storage: SQLite persistence for the Conduit backend.
//!
//! One serialized writer plus a round-robin read pool, `user_version`
//! migrations, and free query functions grouped by table family.

pub mod connection;
pub mod migrations;
pub mod pagination;
pub mod queries;
pub mod tuning;

pub use connection::DatabaseManager;
pub use pagination::{PageRequest, PaginatedResult};
