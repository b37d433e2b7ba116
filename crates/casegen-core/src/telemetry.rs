//! Diagnostic logging for the `casegen` binary.
//!
//! Diagnostics go to stderr. Stdout carries the run summary and audit
//! output only.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset: casegen crates at `level`,
/// dependencies at warn.
pub fn default_filter(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("warn,casegen_core={level},casegen={level}")
}

/// Install the process-wide subscriber, plain text or JSON lines.
///
/// A second call in the same process is a no-op.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let output = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let output = if json {
        output.json().boxed()
    } else {
        output.boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(output)
        .try_init()
        .ok();
}
