use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::dashboard::Limits;

/// Runtime settings, optionally read from a JSON file:
/// ```json
/// {
///   "request_timeout_secs": 30,
///   "connect_timeout_secs": 10,
///   "top_makes": 5,
///   "top_cities": 20,
///   "top_districts": 10
/// }
/// ```
/// Missing keys fall back to the defaults shown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub top_makes: usize,
    pub top_cities: usize,
    pub top_districts: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            top_makes: limits.top_makes,
            top_cities: limits.top_cities,
            top_districts: limits.top_districts,
        }
    }
}

impl AppConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config {path}"))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {path}"))?;
        Ok(config)
    }

    /// Reads the file named by `EV_CONFIG`, or returns the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var("EV_CONFIG") {
            Ok(path) if !path.is_empty() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            top_makes: self.top_makes,
            top_cities: self.top_cities,
            top_districts: self.top_districts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_chart_limits() {
        let config = AppConfig::default();

        assert_eq!(config.limits(), Limits::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_cities": 5, "request_timeout_secs": 3}}"#).unwrap();

        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.top_cities, 5);
        assert_eq!(config.top_makes, 5);
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(AppConfig::load("/nonexistent/ev_insights.json").is_err());
    }
}
