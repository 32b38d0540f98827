//! Command-line configuration resolved once at start-up.
//!
//! Everything the workflow needs from the environment is gathered here into
//! [`AppConfig`] and passed down explicitly.

use std::path::PathBuf;
use std::time::Duration;
use clap::Parser;
use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Wait between a saved user and the roster re-read, for backends that do
/// not acknowledge read-your-writes.
pub const DEFAULT_REFRESH_DELAY_MS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request timeout must be at least one second")]
    InvalidTimeout,
}

/// `pinmap` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pinmap",
    about = "Pin yourself on a session's shared map from the terminal",
    version
)]
pub struct Cli {
    /// Session code to join.
    #[arg(value_name = "session-code")]
    pub session_no: String,
    /// Base URL of the map backend.
    #[arg(long = "api-base-url", env = "PINMAP_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    #[arg(long = "timeout-secs", env = "PINMAP_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,
    /// Delay between a saved user and the roster refresh, in milliseconds.
    #[arg(long = "refresh-delay-ms", env = "PINMAP_REFRESH_DELAY_MS", default_value_t = DEFAULT_REFRESH_DELAY_MS)]
    pub refresh_delay_ms: u64,
    /// Write diagnostics to this file (filtered by `RUST_LOG`).
    #[arg(long = "log-file", env = "PINMAP_LOG_FILE", value_name = "path")]
    pub log_file: Option<PathBuf>,
}

/// Settings the workflow runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub refresh_delay: Duration,
}

impl Cli {
    /// Validates the arguments into an [`AppConfig`].
    pub fn to_config(&self) -> Result<AppConfig, ConfigError> {
        Ok(AppConfig {
            api_base_url: parse_base_url(&self.api_base_url)?,
            request_timeout: match self.timeout_secs {
                0 => return Err(ConfigError::InvalidTimeout),
                secs => Duration::from_secs(secs),
            },
            refresh_delay: Duration::from_millis(self.refresh_delay_ms),
        })
    }
}

/// Parses an http(s) base URL and gives it a trailing slash so endpoint
/// paths join beneath it.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pinmap", "ABC123"]).unwrap();
        let config = cli.to_config().unwrap();

        assert_eq!(cli.session_no, "ABC123");
        assert_eq!(config.api_base_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.refresh_delay, Duration::from_millis(300));
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "pinmap",
            "XYZ",
            "--api-base-url",
            "https://maps.example.com/app",
            "--timeout-secs",
            "3",
            "--refresh-delay-ms",
            "0",
            "--log-file",
            "/tmp/pinmap.log",
        ])
        .unwrap();
        let config = cli.to_config().unwrap();

        assert_eq!(config.api_base_url.as_str(), "https://maps.example.com/app/");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert!(config.refresh_delay.is_zero());
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/pinmap.log")));
    }

    #[test]
    fn test_session_code_is_required() {
        assert!(Cli::try_parse_from(["pinmap"]).is_err());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(matches!(
            parse_base_url("ftp://maps.example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let cli = Cli::try_parse_from(["pinmap", "A", "--timeout-secs", "0"]).unwrap();
        assert!(matches!(cli.to_config(), Err(ConfigError::InvalidTimeout)));
    }
}
