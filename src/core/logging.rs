//! Diagnostics via `tracing`
//!
//! Logs go to stderr so they never mix with results on stdout. `RUST_LOG`
//! wins when set; otherwise the level is `warn`, or `debug` with `--verbose`.

use std::io::{self, IsTerminal};
use tracing_subscriber::{fmt, EnvFilter};

/// Pick the filter directive for this run
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Escape codes only when colors are on and stderr is a terminal
pub fn use_ansi(color: bool, stderr_is_terminal: bool) -> bool {
    color && stderr_is_terminal
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init_tracing(verbose: bool, color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(use_ansi(color, io::stderr().is_terminal()))
        .with_target(false)
        .without_time()
        .try_init();
}
