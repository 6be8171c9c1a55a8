//! Tracing setup for the command-line tools.
//!
//! Log lines go to stderr so computed results on stdout stay pipeable.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Local time with millisecond precision and UTC offset.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Default directive when `RUST_LOG` is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Installs the global subscriber. Call once at startup.
///
/// `RUST_LOG` overrides the level; otherwise `info`, or `debug` when
/// `verbose` is set. A second call is a no-op.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .with_writer(io::stderr)
        .try_init();
}
