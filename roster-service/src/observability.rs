//! Structured logging

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the JSON log subscriber
///
/// The filter comes from `service.log_level` and falls back to `info` when it
/// does not parse. A second call keeps the subscriber that is already
/// installed.
pub fn init_tracing(config: &Config) {
    let log_level = &config.service.log_level;

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();

    match installed {
        Ok(()) => tracing::info!(
            service = %config.service.name,
            environment = %config.service.environment,
            "Tracing initialized"
        ),
        Err(_) => tracing::debug!("Tracing subscriber already installed"),
    }
}

/// Flush logs before exit
pub fn shutdown_tracing() {
    tracing::info!("Tracing shutdown complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        let config = Config::default();
        init_tracing(&config);
        init_tracing(&config);
    }

    #[test]
    fn test_bad_filter_falls_back() {
        let mut config = Config::default();
        config.service.log_level = "not a [valid filter".to_string();
        init_tracing(&config);
    }
}
