//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::error::{MemlinkError, Result};
use crate::settings::LogLevel;

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `level` applies to every target.
/// With `json` set, events are emitted as one JSON object per line.
///
/// # Errors
/// Returns `MemlinkError::Telemetry` if a global subscriber is already set.
pub fn init_tracing(level: LogLevel, json: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| MemlinkError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_fails() {
        // The first call may or may not win depending on test ordering.
        let _ = init_tracing(LogLevel::Debug, false);
        let err = init_tracing(LogLevel::Info, true).expect_err("should fail");
        assert!(matches!(err, MemlinkError::Telemetry(_)));
    }
}
