use crate::styles::{DEFAULT_BRAND, DEFAULT_SET_NAME};
use crate::wheel::WheelGeometry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub wheel: WheelGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog JSON file; `~` is expanded
    #[serde(default = "default_catalog_path")]
    pub path: String,
    #[serde(default = "default_brand")]
    pub default_brand: String,
    #[serde(default = "default_set")]
    pub default_set: String,
}

fn default_catalog_path() -> String {
    data_dir().join("catalog.json").display().to_string()
}

fn default_brand() -> String {
    DEFAULT_BRAND.to_string()
}

fn default_set() -> String {
    DEFAULT_SET_NAME.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            default_brand: default_brand(),
            default_set: default_set(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_path")]
    pub path: String,
    /// Oldest palettes are dropped beyond this
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

fn default_history_path() -> String {
    data_dir().join("history.json").display().to_string()
}

fn default_max_records() -> usize {
    500
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            max_records: default_max_records(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Colors per generated palette when `--count` is not given
    #[serde(default = "default_color_count")]
    pub color_count: usize,
    /// Colors taken from an image when `--count` is not given
    #[serde(default = "default_color_count")]
    pub image_color_count: usize,
}

fn default_color_count() -> usize {
    5
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            color_count: default_color_count(),
            image_color_count: default_color_count(),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "huematch", "huematch")
}

fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Load the default config file, creating it when missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, creating a default file if missing.
    /// A corrupt file is left alone and defaults are used.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            match toml::from_str::<Config>(&data) {
                Ok(config) => Ok(config),
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse config at {}: {}. Using default configuration.",
                        path.display(),
                        e
                    );
                    Ok(Config::default())
                }
            }
        } else {
            let config = Config::default();
            config.save_to(path)?;
            tracing::debug!(path = %path.display(), "wrote default config");
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = toml::to_string_pretty(self)?;
        fs::write(path, data)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    pub fn catalog_path(&self) -> PathBuf {
        expand_tilde(&self.catalog.path)
    }

    pub fn history_path(&self) -> PathBuf {
        expand_tilde(&self.history.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, Config::default());
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[palette]\ncolor_count = 8\n\n[wheel]\nbase_radius = 50.0\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.palette.color_count, 8);
        assert_eq!(config.palette.image_color_count, 5);
        assert_eq!(config.wheel.base_radius, 50.0);
        assert_eq!(config.wheel.ring_width, 26.0);
        assert_eq!(config.catalog.default_brand, "ohuhu");
        assert_eq!(config.history.max_records, 500);
    }

    #[test]
    fn test_corrupt_file_uses_defaults_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[palette\ncolor_count = ").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[palette\ncolor_count = "
        );
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
        assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/a/b"), home.join("a/b"));
        }
    }

    #[test]
    fn test_paths_expand() {
        let mut config = Config::default();
        config.history.path = "/srv/history.json".to_string();
        assert_eq!(config.history_path(), PathBuf::from("/srv/history.json"));
        assert!(config.catalog_path().ends_with("catalog.json"));
    }
}
