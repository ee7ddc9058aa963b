//! Logging
//!
//! Installs a `tracing-subscriber` fmt subscriber. `RUST_LOG` wins over the
//! configured level.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber; later calls are no-ops
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level = %config.log_level, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let config = Config {
            log_level: "not a [valid filter".to_string(),
            ..Config::default()
        };
        init_logging(&config);
        init_logging(&Config::default());
    }
}
