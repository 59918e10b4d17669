use std::time::Duration;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Runtime settings read from `ROOMLEDGER_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the Prometheus exporter; metrics stay off when absent.
    pub metrics_port: Option<u16>,
    /// Period between sweep passes.
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metrics_port: None,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            metrics_port: std::env::var("ROOMLEDGER_METRICS_PORT")
                .ok()
                .and_then(|s| s.parse().ok()),
            sweep_interval: std::env::var("ROOMLEDGER_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
        }
    }
}
