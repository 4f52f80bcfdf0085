//! Logging setup for the `patgen` binary.
//!
//! Library code logs through `log` and `tracing` macros and never installs a
//! subscriber itself. The binary calls [`init_tracing`] once at startup; `log`
//! records are bridged into the same subscriber.
//!
//! The filter comes from `PATGEN_LOG` (any `EnvFilter` directive). Without
//! it, the level is derived from the `-v` count.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "PATGEN_LOG";

/// Level used for `-v` count `verbosity` when `PATGEN_LOG` is unset.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

/// Install the global subscriber, writing to stderr.
///
/// A second call is a no-op, so tests and embedders may call it freely.
pub fn init_tracing(verbosity: u8) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
