//! Tracing setup for the `modship` binary.
//!
//! Logging is owned by the CLI crate to keep the core crate
//! lightweight. Diagnostics go to stderr so module payloads on stdout
//! stay clean.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// Verbosity maps 0/1/2+ to INFO/DEBUG/TRACE for this crate's targets;
/// a `RUST_LOG` directive still applies when set. With `json`, events
/// are emitted as JSON lines instead of the human format.
///
/// # Panics
/// Panics if the subscriber cannot be installed (e.g., called twice).
pub fn init(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"))
        .add_directive(format!("modship={level}").parse().unwrap())
        .add_directive(level.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
