//! telemetry
//!
//! Tracing subscriber setup for the `gitfleet` binary.
//!
//! Library code only emits events; [`init_tracing`] is called once from
//! [`crate::cli::run`]. Log lines always go to stderr so that reports
//! written to stdout (CSV in particular) stay machine-readable.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default level: `debug` with `--debug`, otherwise `warn`.
pub fn default_level(debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

/// Initialise the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. With `json`, events are
/// written as newline-delimited JSON. Only the first call in a process
/// takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    if json {
        registry.with(layer.json()).try_init().ok();
    } else {
        registry.with(layer).try_init().ok();
    }
}
