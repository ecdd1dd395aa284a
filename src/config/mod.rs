use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::poll::Poller;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transcript acquisition settings
    pub pipeline: PipelineConfig,

    /// Where finished transcripts go
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Scheme and host that relative caption URLs and the timedtext API hang off
    pub host_root: String,

    /// Language prefix preferred when choosing a caption track
    pub preferred_language: String,

    /// Value of the `fmt` query parameter requested from caption endpoints
    pub caption_format: String,

    /// Delay between transcript panel checks after opening it
    pub poll_interval_ms: u64,

    /// Number of panel checks before giving up
    pub poll_max_attempts: u32,

    /// Wait after the panel appears so its rows can render
    pub panel_populate_delay_ms: u64,

    /// Wait after opening the overflow menu before its items are queried
    pub menu_settle_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for transcript files (current directory if unset)
    pub directory: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            host_root: "https://www.youtube.com".to_string(),
            preferred_language: "en".to_string(),
            caption_format: "srv3".to_string(),
            poll_interval_ms: 500,
            poll_max_attempts: 20,
            panel_populate_delay_ms: 1000,
            menu_settle_delay_ms: 500,
        }
    }
}

impl PipelineConfig {
    /// Host root without a trailing slash
    pub fn host_root(&self) -> &str {
        self.host_root.trim_end_matches('/')
    }

    pub fn panel_poller(&self) -> Poller {
        Poller::new(Duration::from_millis(self.poll_interval_ms), self.poll_max_attempts)
    }

    pub fn panel_populate_delay(&self) -> Duration {
        Duration::from_millis(self.panel_populate_delay_ms)
    }

    pub fn menu_settle_delay(&self) -> Duration {
        Duration::from_millis(self.menu_settle_delay_ms)
    }

    pub fn validate(&self) -> Result<()> {
        crate::utils::validate_and_normalize_url(&self.host_root)
            .context("pipeline.host_root must be an http(s) URL")?;

        if self.poll_max_attempts == 0 {
            anyhow::bail!("pipeline.poll_max_attempts must be at least 1");
        }

        if self.preferred_language.trim().is_empty() {
            anyhow::bail!("pipeline.preferred_language must not be empty");
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading configuration from {}", config_path.display());
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate a specific configuration file
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = fs_err::read_to_string(path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("transcript-grab").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Host: {}", self.pipeline.host_root);
        println!("  Preferred Language: {}", self.pipeline.preferred_language);
        println!("  Caption Format: {}", self.pipeline.caption_format);
        println!(
            "  Panel Polling: every {}ms, up to {} attempts",
            self.pipeline.poll_interval_ms, self.pipeline.poll_max_attempts
        );
        match &self.output.directory {
            Some(dir) => println!("  Output Directory: {}", dir.display()),
            None => println!("  Output Directory: (current directory)"),
        }
    }
}
