use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::media::{DownloadSettings, FallbackMode, StrategyProfile};

pub const DEFAULT_OUTPUT_DIR: &str = "./downloads";
const DEFAULT_YTDLP: &str = "yt-dlp";
const DEFAULT_DESCRIBE_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub download: DownloadConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct DownloadConfig {
    pub output_dir: Option<PathBuf>,
    pub profile: Option<StrategyProfile>,
    pub fallback: Option<FallbackMode>,
    pub ytdlp_path: Option<String>,
    pub describe_timeout_secs: Option<u64>,
    pub write_info_json: Option<bool>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub profile: Option<StrategyProfile>,
    pub fallback: Option<FallbackMode>,
    pub write_info_json: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn get_logging_format(&self) -> &str {
        &self.logging.format
    }

    pub fn ytdlp_path(&self) -> &str {
        self.download.ytdlp_path.as_deref().unwrap_or(DEFAULT_YTDLP)
    }

    pub fn describe_timeout(&self) -> Duration {
        Duration::from_secs(
            self.download
                .describe_timeout_secs
                .unwrap_or(DEFAULT_DESCRIBE_TIMEOUT_SECS),
        )
    }

    /// CLI over file over profile defaults.
    pub fn download_settings(&self, overrides: &Overrides) -> DownloadSettings {
        let profile = overrides
            .profile
            .or(self.download.profile)
            .unwrap_or_default();
        let output_dir = overrides
            .output_dir
            .clone()
            .or_else(|| self.download.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let mut settings = DownloadSettings::for_profile(output_dir, profile);
        if let Some(fallback) = overrides.fallback.or(self.download.fallback) {
            settings.fallback = fallback;
        }
        if overrides.write_info_json {
            settings.write_info_json = true;
        } else if let Some(write) = self.download.write_info_json {
            settings.write_info_json = write;
        }
        settings
    }
}

/// `--config`, then `$VIDFETCH_CONFIG`, then the XDG and home config dirs.
pub fn find_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var("VIDFETCH_CONFIG") {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = Path::new(&xdg_config_home)
            .join("vidfetch")
            .join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(".config").join("vidfetch").join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    None
}
