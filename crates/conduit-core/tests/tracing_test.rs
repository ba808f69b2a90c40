//! Tests for the tracing setup.

use std::sync::Mutex;

use conduit_core::tracing::init_tracing;

/// Serializes tests that touch CONDUIT_LOG.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn init_tracing_with_filter_directives() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CONDUIT_LOG", "conduit_api=debug,conduit_storage=warn");
    init_tracing();
    std::env::remove_var("CONDUIT_LOG");
}

#[test]
fn init_tracing_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("CONDUIT_LOG", "this_is_garbage=not_a_level");
    init_tracing();
    std::env::remove_var("CONDUIT_LOG");
}
