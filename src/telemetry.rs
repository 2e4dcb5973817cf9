use tracing_subscriber::{EnvFilter, fmt};

/// Diagnostics go to stderr; stdout is reserved for the JSON result.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
