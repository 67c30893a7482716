use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::{Rgb, TrackerFilter};

fn default_category() -> String {
    "General".to_string()
}
fn default_color() -> Rgb {
    Rgb::new(0x33, 0xCF, 0x69)
}
fn default_emoji() -> String {
    "⭐".to_string()
}
fn default_pinned_title() -> String {
    "Pinned".to_string()
}
fn default_tick_rate_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackersConfig {
    /// Category new trackers land in when none is given; created on demand
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_color")]
    pub default_color: Rgb,
    #[serde(default = "default_emoji")]
    pub default_emoji: String,
}

impl Default for TrackersConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            default_color: default_color(),
            default_emoji: default_emoji(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub default_filter: TrackerFilter,
    #[serde(default = "default_pinned_title")]
    pub pinned_title: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_filter: TrackerFilter::default(),
            pinned_title: default_pinned_title(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub trackers: TrackersConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "tracker")
            .context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("tracker.db"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.trackers.default_category, "General");
        assert_eq!(config.display.default_filter, TrackerFilter::All);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[display]\ndefault_filter = \"not-completed\"\n\n[trackers]\ndefault_color = \"#FF881E\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.display.default_filter, TrackerFilter::NotCompleted);
        assert_eq!(config.display.pinned_title, "Pinned");
        assert_eq!(config.trackers.default_color, Rgb::new(0xFF, 0x88, 0x1E));
        assert_eq!(config.trackers.default_emoji, "⭐");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.trackers.default_category = "Chores".to_string();
        config.display.tick_rate_ms = 250;

        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[trackers]\ndefault_color = \"green\"\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }
}
