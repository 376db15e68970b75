//! # Logging
//!
//! `tracing-subscriber` setup shared by the CLI and the tests. The core only
//! emits `tracing` events; installing a subscriber is the caller's choice.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the filter is `info`, or `debug` when
/// `debug` is true. Logs go to stderr so stdout stays clean for `--json`.
///
/// ```no_run
/// forge_core::logging::init(false);
/// ```
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: a second call (tests, embedding) must not panic
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .try_init();
}

/// Verbose subscriber for tests, captured by the test harness.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
