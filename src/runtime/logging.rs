use tagwright::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// `-v` forces `debug`; otherwise `RUST_LOG`, then the configured filter.
fn filter(settings: &LoggingSettings, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter))
}

pub fn init(settings: &LoggingSettings, verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(settings, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
