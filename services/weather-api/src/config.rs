//! Service configuration loaded from YAML.
//!
//! Credentials never live in the file; the data portal service key comes
//! from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use upstream::{airkorea, kasi, kma, nominatim, HttpConfig};

/// Environment variables checked, in order, for the data.go.kr service key.
pub const SERVICE_KEY_VARS: [&str; 2] = ["DATA_GO_KR_API_KEY", "openAPIKey"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub upstreams: UpstreamsConfig,
    pub access: AccessConfig,
}

/// Where and how to reach the upstream providers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent sent to every provider
    pub user_agent: String,
    pub kma_base_url: String,
    pub airkorea_station_url: String,
    pub airkorea_measurement_url: String,
    pub nominatim_url: String,
    pub kasi_url: String,
    pub astronomy: AstronomyConfig,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: HttpConfig::default().user_agent,
            kma_base_url: kma::DEFAULT_BASE_URL.to_string(),
            airkorea_station_url: airkorea::DEFAULT_STATION_URL.to_string(),
            airkorea_measurement_url: airkorea::DEFAULT_MEASUREMENT_URL.to_string(),
            nominatim_url: nominatim::DEFAULT_BASE_URL.to_string(),
            kasi_url: kasi::DEFAULT_BASE_URL.to_string(),
            astronomy: AstronomyConfig::default(),
        }
    }
}

impl UpstreamsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: self.timeout(),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AstronomyConfig {
    pub provider: AstronomyProvider,
}

/// Which sunrise/sunset implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AstronomyProvider {
    /// Computed in-process
    #[default]
    Local,
    /// KASI rise/set web service
    Kasi,
}

/// Client blocking.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// File with one blocked IP address per line
    pub blacklist_path: Option<PathBuf>,
    /// Requests allowed inside one window before the client is blocked
    pub max_requests: usize,
    pub window_secs: u64,
    pub block_secs: u64,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            blacklist_path: None,
            max_requests: 5,
            window_secs: 1,
            block_secs: 1800,
        }
    }
}

impl AppConfig {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "Config file does not exist, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document parses as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// The data.go.kr service key from the environment, if set.
pub fn service_key_from_env() -> Option<String> {
    SERVICE_KEY_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.upstreams.timeout(), Duration::from_secs(10));
        assert_eq!(config.upstreams.astronomy.provider, AstronomyProvider::Local);
        assert_eq!(config.access.max_requests, 5);
        assert_eq!(config.access.window_secs, 1);
        assert_eq!(config.access.block_secs, 1800);
        assert!(config.upstreams.kma_base_url.contains("VilageFcstInfoService_2.0"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml(
            r#"
upstreams:
  timeout_secs: 3
  astronomy:
    provider: kasi
access:
  max_requests: 10
"#,
        )
        .unwrap();

        assert_eq!(config.upstreams.timeout(), Duration::from_secs(3));
        assert_eq!(config.upstreams.astronomy.provider, AstronomyProvider::Kasi);
        assert_eq!(config.access.max_requests, 10);
        assert_eq!(config.access.block_secs, 1800);
        assert_eq!(config.upstreams.nominatim_url, nominatim::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = AppConfig::from_yaml("upstreams:\n  astronomy:\n    provider: moon\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config.access.max_requests, 5);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "access:\n  blacklist_path: /etc/weather/blacklist.txt").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(
            config.access.blacklist_path.as_deref(),
            Some(Path::new("/etc/weather/blacklist.txt"))
        );
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.upstreams.timeout_secs, 10);
    }
}
