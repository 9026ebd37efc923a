//! Process configuration, read once at startup.

use std::time::Duration;

/// Which predictor backs the forecast workflow.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ForecastMode {
    /// The external predictor service, called over HTTP.
    Http,
    /// The built-in weighted-moving-average predictor.
    Local,
}

/// Everything the process reads from the environment.
///
/// No process-wide mutable state: the config is built once in `main` and
/// passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub forecast_mode: ForecastMode,
    pub forecast_service_url: String,
    pub forecast_timeout: Duration,
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
    pub issue_max_concurrent: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            forecast_mode: ForecastMode::Http,
            forecast_service_url: "http://localhost:8080/forecast/predict".to_string(),
            forecast_timeout: Duration::from_millis(30_000),
            use_persistent_stores: false,
            database_url: None,
            issue_max_concurrent: restocker_infra::DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl AppConfig {
    /// Build the config from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let forecast_mode = match std::env::var("FORECAST_MODE").as_deref() {
            Ok("local") => ForecastMode::Local,
            Ok("http") | Err(_) => ForecastMode::Http,
            Ok(other) => {
                tracing::warn!(mode = other, "unknown FORECAST_MODE, using http");
                ForecastMode::Http
            }
        };

        Self {
            port: env_parsed("PORT", defaults.port),
            forecast_mode,
            forecast_service_url: std::env::var("FORECAST_SERVICE_URL")
                .unwrap_or(defaults.forecast_service_url),
            forecast_timeout: Duration::from_millis(env_parsed(
                "FORECAST_TIMEOUT_MS",
                defaults.forecast_timeout.as_millis() as u64,
            )),
            use_persistent_stores: env_parsed("USE_PERSISTENT_STORES", false),
            database_url: std::env::var("DATABASE_URL").ok(),
            issue_max_concurrent: env_parsed(
                "ISSUE_MAX_CONCURRENT",
                defaults.issue_max_concurrent,
            ),
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %raw, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.port, 4000);
        assert_eq!(config.forecast_mode, ForecastMode::Http);
        assert_eq!(config.forecast_timeout, Duration::from_millis(30_000));
        assert!(!config.use_persistent_stores);
        assert_eq!(config.issue_max_concurrent, 4);
    }
}
