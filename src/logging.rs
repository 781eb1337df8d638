//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`; stdout is reserved for results.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive (e.g. `refpatch=debug`)
pub const LOG_ENV: &str = "REFPATCH_LOG";

/// Filter used when `REFPATCH_LOG` is not set
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
