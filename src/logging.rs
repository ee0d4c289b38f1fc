use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CASTSVG_LOG";
pub const DEFAULT_FILTER: &str = "warn";

/// Diagnostics go to stderr so stdout stays a clean document.
pub fn init_tracing() {
    // CASTSVG_LOG=castsvg=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
