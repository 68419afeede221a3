use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Map the number of `-v` flags to a default filter directive
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize diagnostic logging on stderr.
///
/// `RUST_LOG` takes precedence; otherwise the level follows `verbosity`.
/// Stdout stays reserved for the report tables.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
