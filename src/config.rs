//! Optional config file loading. Search order: ./skoob.toml, then
//! $XDG_CONFIG_HOME/skoob/config.toml (or ~/.config/skoob/config.toml).

use std::time::Duration;

use serde::Deserialize;

use crate::http::TransportBuilder;
use crate::retry::Backoff;

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Maximum requests per rate-limit window (default 1).
    pub rate_limit_calls: Option<usize>,
    /// Rate-limit window in seconds (default 1.0).
    pub rate_limit_period_secs: Option<f64>,
    /// Number of retries after the initial attempt for transient failures.
    pub max_retries: Option<u32>,
    /// Initial backoff delay in milliseconds.
    pub retry_base_delay_ms: Option<u64>,
    /// Multiplicative backoff factor.
    pub retry_factor: Option<f64>,
    /// Upper bound for a single backoff delay in milliseconds.
    pub retry_max_delay_ms: Option<u64>,
}

impl Config {
    /// Apply the present keys on top of a transport builder's defaults.
    pub fn apply(&self, mut builder: TransportBuilder) -> TransportBuilder {
        if let Some(ua) = &self.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if self.rate_limit_calls.is_some() || self.rate_limit_period_secs.is_some() {
            let calls = self.rate_limit_calls.unwrap_or(1);
            let period = Duration::from_secs_f64(self.rate_limit_period_secs.unwrap_or(1.0));
            builder = builder.rate_limit(calls, period);
        }
        if self.max_retries.is_some()
            || self.retry_base_delay_ms.is_some()
            || self.retry_factor.is_some()
            || self.retry_max_delay_ms.is_some()
        {
            let backoff = Backoff::new(
                self.max_retries.unwrap_or(3),
                Duration::from_millis(self.retry_base_delay_ms.unwrap_or(100)),
                self.retry_factor.unwrap_or(2.0),
                Duration::from_millis(self.retry_max_delay_ms.unwrap_or(60_000)),
            );
            builder = builder.backoff(backoff);
        }
        builder
    }
}

/// Search order: (1) ./skoob.toml, (2) $XDG_CONFIG_HOME/skoob/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("skoob.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("skoob").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            let s = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            let config: Config = toml::from_str(&s)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
            return Ok(Some(config));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let c: Config = toml::from_str("").unwrap();
        assert!(c.user_agent.is_none());
        assert!(c.timeout_secs.is_none());
        assert!(c.rate_limit_calls.is_none());
        assert!(c.rate_limit_period_secs.is_none());
        assert!(c.max_retries.is_none());
        assert!(c.retry_base_delay_ms.is_none());
        assert!(c.retry_factor.is_none());
        assert!(c.retry_max_delay_ms.is_none());
    }

    #[test]
    fn parse_full_config() {
        let s = r#"
            user_agent = "Custom/1.0"
            timeout_secs = 60
            rate_limit_calls = 2
            rate_limit_period_secs = 0.5
            max_retries = 5
            retry_base_delay_ms = 250
            retry_factor = 3.0
            retry_max_delay_ms = 10000
        "#;
        let c: Config = toml::from_str(s).unwrap();
        assert_eq!(c.user_agent.as_deref(), Some("Custom/1.0"));
        assert_eq!(c.timeout_secs, Some(60));
        assert_eq!(c.rate_limit_calls, Some(2));
        assert_eq!(c.rate_limit_period_secs, Some(0.5));
        assert_eq!(c.max_retries, Some(5));
        assert_eq!(c.retry_base_delay_ms, Some(250));
        assert_eq!(c.retry_factor, Some(3.0));
        assert_eq!(c.retry_max_delay_ms, Some(10000));
    }

    #[test]
    fn parse_partial_config() {
        let c: Config = toml::from_str("rate_limit_calls = 3").unwrap();
        assert_eq!(c.rate_limit_calls, Some(3));
        assert!(c.user_agent.is_none());
        assert!(c.timeout_secs.is_none());
    }

    #[test]
    fn invalid_toml_errors() {
        assert!(toml::from_str::<Config>("user_agent = [").is_err());
    }
}
