//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through `tracing`, so they never mix with
//! table or CSV output on stdout. The persistent record of changes is the
//! audit journal, not this log.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output for
/// this crate and the default shows warnings only. Later calls are no-ops.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let default_filter = if verbose { "bookstore=debug" } else { "bookstore=warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        // Another subscriber may already be installed (e.g. by a test harness)
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
