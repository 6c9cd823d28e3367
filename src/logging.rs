//! Installation of the `tracing` subscriber.
//!
//! Filter directives come from the `SYNCEVENT_LOG` environment variable when
//! it is set, otherwise from [`Config`]'s log filter (default `info`).
//! Event transitions are logged at `trace` level under the `syncevent`
//! target, so `SYNCEVENT_LOG=syncevent=trace` shows every signal and wait.

use crate::config::{Config, LOG_FILTER_ENV};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a stderr fmt subscriber. Only the first call has any effect.
pub fn init(config: &Config) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
            .or_else(|_| EnvFilter::try_new(config.get_log_filter()))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();

        if let Err(err) = result {
            eprintln!("syncevent: logging already initialized: {}", err);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice() {
        let mut config = Config::new();
        config.log_filter("syncevent=debug");
        init(&config);
        init(&config);
        tracing::debug!("logging initialized");
    }
}
