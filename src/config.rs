use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::download::quality;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tidal: TidalConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidalConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Token written by `tidal-dl-ng login`
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default)]
    pub base_path: Option<PathBuf>,
    #[serde(default = "default_quality_label")]
    pub default_quality: String,
    /// Pause between items of an album or playlist
    #[serde(default = "default_download_delay")]
    pub download_delay: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_python")]
    pub python: String,
    /// Use this helper script instead of the embedded one
    #[serde(default)]
    pub script_path: Option<PathBuf>,
}

// Default value functions
fn default_api_base() -> String {
    "https://api.tidal.com/v1".to_string()
}
fn default_audio_quality() -> String {
    "LOSSLESS".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_quality_label() -> String {
    quality::DEFAULT_QUALITY_LABEL.to_string()
}
fn default_download_delay() -> bool {
    true
}
fn default_python() -> String {
    if cfg!(target_os = "windows") {
        "python".to_string()
    } else {
        "python3".to_string()
    }
}

impl Default for TidalConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_file: None,
            audio_quality: default_audio_quality(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            default_quality: default_quality_label(),
            download_delay: default_download_delay(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            script_path: None,
        }
    }
}

impl TidalConfig {
    /// Configured token file, or the tidal-dl-ng default under `~/.config`
    pub fn token_path(&self) -> Option<PathBuf> {
        self.token_file.clone().or_else(|| {
            UserDirs::new().map(|dirs| {
                dirs.home_dir()
                    .join(".config")
                    .join("tidal_dl_ng")
                    .join("token.json")
            })
        })
    }
}

impl DownloadConfig {
    /// Base directory for downloads when a caller gives no override
    pub fn resolved_base_path(&self) -> PathBuf {
        self.base_path.clone().unwrap_or_else(default_music_dir)
    }
}

/// `<home>/Music/TIDAL`
pub fn default_music_dir() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_default()
        .join("Music")
        .join("TIDAL")
}

pub struct ConfigManager {
    config_dir: PathBuf,
    config_file: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Load the config from the platform config directory, creating a default one
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "tidal-mcp")
            .context("Failed to determine config directory")?;

        Self::from_path(project_dirs.config_dir().join("config.toml"))
    }

    /// Load the config from an explicit file, creating it with defaults if missing
    pub fn from_path(config_file: PathBuf) -> Result<Self> {
        let config_dir = config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;
        }

        let config = if config_file.exists() {
            Self::load_config(&config_file)?
        } else {
            let default_config = Config::default();
            Self::save_config(&config_file, &default_config)?;
            default_config
        };

        Ok(Self {
            config_dir,
            config_file,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    fn load_config(config_file: &Path) -> Result<Config> {
        let content = fs::read_to_string(config_file)
            .with_context(|| format!("Failed to read config file: {:?}", config_file))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_file))?;

        Ok(config)
    }

    fn save_config(config_file: &Path, config: &Config) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(config_file, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_file))?;

        Ok(())
    }

    /// Write a default config next to the active one for reference
    pub fn create_sample_config(&self) -> Result<PathBuf> {
        let sample_file = self.config_dir.join("config.sample.toml");
        Self::save_config(&sample_file, &Config::default())?;
        Ok(sample_file)
    }

    /// Validate the current configuration
    pub fn validate(&self) -> Result<()> {
        if self.config.tidal.api_base.trim().is_empty() {
            anyhow::bail!("tidal.api_base cannot be empty");
        }

        if self.config.tidal.request_timeout_secs == 0 {
            anyhow::bail!("tidal.request_timeout_secs must be greater than 0");
        }

        if !quality::is_known_label(&self.config.download.default_quality) {
            anyhow::bail!(
                "download.default_quality '{}' is not one of: {}",
                self.config.download.default_quality,
                quality::labels().collect::<Vec<_>>().join(", ")
            );
        }

        if self.config.bridge.python.trim().is_empty() {
            anyhow::bail!("bridge.python cannot be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let manager = ConfigManager::from_path(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(manager.config().download.default_quality, "HiFi");
        assert_eq!(manager.config().tidal.api_base, "https://api.tidal.com/v1");
        assert!(manager.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[download]\nbase_path = \"/srv/music\"\n").unwrap();

        let manager = ConfigManager::from_path(path).unwrap();
        let config = manager.config();
        assert_eq!(
            config.download.resolved_base_path(),
            PathBuf::from("/srv/music")
        );
        assert!(config.download.download_delay);
        assert_eq!(config.tidal.request_timeout_secs, 30);
    }

    #[test]
    fn test_validation_rejects_unknown_quality() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[download]\ndefault_quality = \"Ultra\"\n").unwrap();
        assert!(ConfigManager::from_path(path.clone()).unwrap().validate().is_err());

        fs::write(
            &path,
            "[tidal]\nrequest_timeout_secs = 0\n\n[download]\ndefault_quality = \"Master\"\n",
        )
        .unwrap();
        assert!(ConfigManager::from_path(path).unwrap().validate().is_err());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[bridge]\npython = \"/opt/venv/bin/python\"\n").unwrap();

        let manager = ConfigManager::from_path(path.clone()).unwrap();
        assert_eq!(manager.config().bridge.python, "/opt/venv/bin/python");
        assert!(fs::read_to_string(&path).unwrap().contains("/opt/venv/bin/python"));

        let sample = manager.create_sample_config().unwrap();
        assert_eq!(sample, dir.path().join("config.sample.toml"));
        assert!(sample.exists());
    }

    #[test]
    fn test_default_music_dir_layout() {
        let dir = default_music_dir();
        assert!(dir.ends_with("Music/TIDAL"));
    }
}
