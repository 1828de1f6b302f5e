//! Tracing initialization

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--debug` selects debug-level
/// logging for keg crates and warnings stay quiet by default.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug { "keg=debug" } else { "keg=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .init();
}
