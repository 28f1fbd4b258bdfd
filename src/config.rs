use crate::profile::UserProfile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_upload_endpoint")]
    pub upload_endpoint: String,

    #[serde(default = "default_videos_endpoint")]
    pub videos_endpoint: String,

    #[serde(default)]
    pub media_dir: Option<String>,

    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,

    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whole-request limit for the upload POST, in seconds
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout: u64,

    #[serde(default)]
    pub profile: UserProfile,

    #[serde(default = "default_profile_save_delay_ms")]
    pub profile_save_delay_ms: u64,
}

fn default_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_upload_endpoint() -> String {
    "/api/upload".to_string()
}

fn default_videos_endpoint() -> String {
    "/api/videos".to_string()
}

fn default_max_upload_mb() -> u64 {
    50
}

fn default_progress_interval_ms() -> u64 {
    200
}

fn default_timeout() -> u64 {
    30
}

fn default_upload_timeout() -> u64 {
    600
}

fn default_profile_save_delay_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            upload_endpoint: default_upload_endpoint(),
            videos_endpoint: default_videos_endpoint(),
            media_dir: None,
            max_upload_mb: default_max_upload_mb(),
            progress_interval_ms: default_progress_interval_ms(),
            timeout: default_timeout(),
            upload_timeout: default_upload_timeout(),
            profile: UserProfile::default(),
            profile_save_delay_ms: default_profile_save_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/reelbox/config.json)
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("reelbox").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(anyhow::anyhow!("api_url cannot be empty"));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!("api_url must start with http:// or https://"));
        }

        for (name, endpoint) in [
            ("upload_endpoint", &self.upload_endpoint),
            ("videos_endpoint", &self.videos_endpoint),
        ] {
            if !endpoint.starts_with('/') {
                return Err(anyhow::anyhow!("{} must start with '/'", name));
            }
        }

        if self.max_upload_mb == 0 {
            return Err(anyhow::anyhow!("max_upload_mb must be greater than zero"));
        }

        if self.progress_interval_ms == 0 {
            return Err(anyhow::anyhow!(
                "progress_interval_ms must be greater than zero"
            ));
        }

        if self.timeout == 0 || self.upload_timeout == 0 {
            return Err(anyhow::anyhow!(
                "timeout and upload_timeout must be greater than zero"
            ));
        }

        Ok(())
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), self.upload_endpoint)
    }

    pub fn videos_url(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), self.videos_endpoint)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout)
    }

    pub fn profile_save_delay(&self) -> Duration {
        Duration::from_millis(self.profile_save_delay_ms)
    }

    /// Media library location, falling back to ~/Videos
    pub fn media_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.media_dir {
            return Ok(PathBuf::from(dir));
        }
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join("Videos"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.upload_url(), "http://localhost:8000/api/upload");
        assert_eq!(config.videos_url(), "http://localhost:8000/api/videos");
        assert_eq!(config.max_upload_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.progress_interval(), Duration::from_millis(200));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.upload_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            Config::from_json(r#"{"api_url": "https://videos.example.com/", "max_upload_mb": 10}"#)
                .unwrap();

        assert_eq!(config.upload_url(), "https://videos.example.com/api/upload");
        assert_eq!(config.max_upload_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.profile.name, "John Doe");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.max_upload_mb = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.progress_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upload_endpoint = "api/upload".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.upload_timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_media_dir() {
        let mut config = Config::default();
        config.media_dir = Some("/srv/media".to_string());
        assert_eq!(config.media_dir().unwrap(), PathBuf::from("/srv/media"));
    }
}
