//! Query modules, one per table family.

pub mod articles;
pub mod comments;
pub mod favorites;
pub mod follows;
pub mod tags;
pub mod users;
pub mod util;
