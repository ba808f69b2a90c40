//! conduit-api: the Conduit REST API over axum.
//!
//! Handlers run storage work on the blocking pool through [`AppState`];
//! request payloads are parsed from raw bytes so malformed JSON and field
//! validation map to distinct status codes.

pub mod app;
pub mod auth;
pub mod error;
pub mod params;
pub mod payloads;
pub mod routes;
pub mod serializers;
pub mod server;
pub mod state;
pub mod validation;

pub use app::build_router;
pub use error::ApiError;
pub use state::AppState;
