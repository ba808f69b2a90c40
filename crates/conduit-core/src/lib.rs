//! # conduit-core
//!
//! Shared foundations for the Conduit blogging backend: one error enum per
//! subsystem, layered TOML configuration, tracing setup, constants and the
//! title-to-slug transform used by the article store.

pub mod config;
pub mod constants;
pub mod errors;
pub mod slug;
pub mod tracing;
