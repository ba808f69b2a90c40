//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "CONDUIT_LOG";

/// Initialize the Conduit tracing/logging system.
///
/// Reads `CONDUIT_LOG` for per-crate log levels, e.g.
/// `CONDUIT_LOG=conduit_api=debug,conduit_storage=info,tower_http=debug`.
///
/// Falls back to `info` if `CONDUIT_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

        // `try_init` so an embedding test harness that already installed a
        // global subscriber does not make us panic.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
