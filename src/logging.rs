use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "stockroom=info,clear_tables=info,tower_http=info";

/// Installs the global fmt subscriber, filtered by `RUST_LOG`.
///
/// Calling it again is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_enables_request_traces() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        assert!(DEFAULT_FILTER.split(',').any(|directive| directive == "tower_http=info"));
        assert!(DEFAULT_FILTER.split(',').any(|directive| directive == "stockroom=info"));
    }
}
