//! Logging setup
//!
//! Library code emits `tracing` events; the binary installs a stderr
//! subscriber whose level follows `-v`/`-q` unless `RUST_LOG` is set.

use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

/// Build the filter for `verbosity`, letting `RUST_LOG` take precedence
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()))
}

/// Install the global subscriber; later calls are ignored
pub fn init_tracing(verbosity: Verbosity) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
