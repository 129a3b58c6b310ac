use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Logs go to stderr; stdout is reserved for `hvac-clean` output.
pub fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("hvac_service=info".parse().unwrap_or_else(|_| LevelFilter::INFO.into()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
