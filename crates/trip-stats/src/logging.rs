/*!
Logging setup for the command-line front end.

Log lines go to stderr so that stdout carries only the requested output
(text, JSON or reports) and can be piped safely.
*/

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Default filter used when `RUST_LOG` is not set
pub fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn,trip_stats=info"
    }
}

/// Initialize logging.
///
/// Behavior:
/// - If RUST_LOG is not set, set a helpful default.
/// - Install a stderr `fmt` layer filtered by `EnvFilter`.
pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_err() {
        // Safety: single-threaded at startup
        unsafe {
            std::env::set_var("RUST_LOG", default_filter());
        }
    }

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());

    if tracing_subscriber::registry().with(fmt_layer).try_init().is_err() {
        tracing::warn!("A global tracing subscriber was already installed");
    }
}
