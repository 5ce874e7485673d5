//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Keel tracing/logging system.
///
/// Reads the `KEEL_LOG` environment variable for per-subsystem log levels.
/// Format: `KEEL_LOG=keel_analysis::graph=debug,keel_analysis::hybrid=info`
///
/// Falls back to `keel=info` if `KEEL_LOG` is not set or is invalid.
/// Calling this more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("KEEL_LOG").unwrap_or_else(|_| EnvFilter::new("keel=info"));

        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
