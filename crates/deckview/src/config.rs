use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::animation::AnimationType;
use crate::storage::FileStorage;
use crate::theme;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "deckview";

pub const KEYS: [&str; 5] = [
    "defaults.theme",
    "defaults.transition",
    "defaults.start_slide",
    "defaults.windowed",
    "storage.dir",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Preset applied on first launch, before anything is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Transition used when no animation config is stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,

    /// 1-indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_slide: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windowed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `deckview config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                log::debug!("Using default config: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# deckview configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Where the customization store lives: the configured directory, or
    /// the per-user data directory.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match self.storage.as_ref().and_then(|s| s.dir.clone()) {
            Some(dir) => Ok(dir),
            None => FileStorage::default_dir(),
        }
    }

    pub fn default_transition(&self) -> Option<AnimationType> {
        let name = self.defaults.as_ref()?.transition.as_deref()?;
        <AnimationType as clap::ValueEnum>::from_str(name, true).ok()
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                if !theme::builtin_themes().iter().any(|t| t.id == value) {
                    let ids: Vec<String> =
                        theme::builtin_themes().into_iter().map(|t| t.id).collect();
                    anyhow::bail!("Invalid theme: {value}. Must be one of: {}", ids.join(", "));
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.transition" => {
                match value {
                    "fade" | "slide" | "scale" | "flip" | "zoom" => {}
                    _ => anyhow::bail!(
                        "Invalid transition: {value}. Must be 'fade', 'slide', 'scale', 'flip', or 'zoom'."
                    ),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .transition = Some(value.to_string());
            }
            "defaults.start_slide" => {
                let n = value
                    .parse::<usize>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        anyhow::anyhow!("Invalid start_slide: {value}. Must be a slide number (1 or more).")
                    })?;
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .start_slide = Some(n);
            }
            "defaults.windowed" => {
                let windowed = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!("Invalid windowed: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .windowed = Some(windowed);
            }
            "storage.dir" => {
                if value.trim().is_empty() {
                    anyhow::bail!("storage.dir must not be empty");
                }
                self.storage.get_or_insert_with(StorageConfig::default).dir =
                    Some(PathBuf::from(value));
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {}", KEYS.join(", ")),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        config.set("defaults.theme", "blue-ocean").unwrap();
        assert!(config.set("defaults.theme", "light").is_err());
        config.set("defaults.transition", "zoom").unwrap();
        assert!(config.set("defaults.transition", "spatial").is_err());
        config.set("defaults.start_slide", "3").unwrap();
        assert!(config.set("defaults.start_slide", "0").is_err());
        config.set("defaults.windowed", "yes").unwrap();
        assert!(config.set("defaults.windowed", "maybe").is_err());
        assert!(config.set("defaults.aspect", "16:9").is_err());

        let defaults = config.defaults.as_ref().unwrap();
        assert_eq!(defaults.theme.as_deref(), Some("blue-ocean"));
        assert_eq!(defaults.start_slide, Some(3));
        assert_eq!(defaults.windowed, Some(true));
        assert_eq!(config.default_transition(), Some(AnimationType::Zoom));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deckview").join(FILENAME);
        let mut config = Config::default();
        config.set("storage.dir", "/tmp/decks").unwrap();
        config.set("defaults.transition", "flip").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.storage_dir().unwrap(), PathBuf::from("/tmp/decks"));
    }

    #[test]
    fn test_missing_file_mentions_show() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("deckview config show"));
    }

    #[test]
    fn test_empty_config_serializes_to_empty_map() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }
}
