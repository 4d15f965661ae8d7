use tracing_subscriber::EnvFilter;

/// Installs the process-wide tracing subscriber at `info` level.
///
/// The level can be overridden per module through `RUST_LOG`, e.g.
/// `RUST_LOG=traintrack=debug` to watch the token refresh path.
pub fn setup_info_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init: tests and embedding applications may already have one installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
