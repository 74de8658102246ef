//! Deck configuration from slidedeck.toml

use crate::acquisition::AcquisitionOptions;
use crate::viewport::ViewportConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the input directory
pub const CONFIG_FILE_NAME: &str = "slidedeck.toml";

/// Deck configuration from slidedeck.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Deck title (HTML `<title>`); the input directory name when unset
    pub title: Option<String>,

    /// Extensions (no dot) read as markup documents
    pub document_extensions: Vec<String>,

    /// Whether images are collected into the asset library
    pub include_images: bool,

    /// Image viewer tunables
    pub viewer: ViewportConfig,
}

impl Default for DeckConfig {
    fn default() -> Self {
        let acquisition = AcquisitionOptions::default();
        Self {
            title: None,
            document_extensions: acquisition.document_extensions,
            include_images: acquisition.include_images,
            viewer: ViewportConfig::default(),
        }
    }
}

/// Errors that can occur when loading or saving deck configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}", path = .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid viewer configuration: {0}")]
    InvalidViewer(String),
}

impl DeckConfig {
    /// Load configuration from a slidedeck.toml file
    ///
    /// # Parameters
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(DeckConfig)` - Successfully loaded configuration
    /// * `Err(ConfigError)` - Error reading, parsing or validating the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: DeckConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load `slidedeck.toml` from a directory, or defaults when it is absent
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            log::info!("Loading configuration from {}", path.display());
            Self::load(&path)
        } else {
            log::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;

        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Check that the viewer limits are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewer.validate().map_err(ConfigError::InvalidViewer)
    }

    /// Acquisition options derived from this configuration
    pub fn acquisition_options(&self) -> AcquisitionOptions {
        AcquisitionOptions {
            document_extensions: self
                .document_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            include_images: self.include_images,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_config_roundtrip() {
        let config = DeckConfig {
            title: Some("Quarterly Review".to_string()),
            document_extensions: vec!["md".to_string()],
            include_images: false,
            viewer: ViewportConfig {
                max_scale: 4.0,
                ..ViewportConfig::default()
            },
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: DeckConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_example_toml() {
        let toml_content = r#"
title = "Architecture Walkthrough"
document_extensions = ["md", ".Markdown"]

[viewer]
max_scale = 6.0
wheel_sensitivity = 0.002
"#;

        let config: DeckConfig = toml::from_str(toml_content).unwrap();

        assert_eq!(config.title.as_deref(), Some("Architecture Walkthrough"));
        assert!(config.include_images);
        assert_eq!(config.viewer.max_scale, 6.0);
        assert_eq!(config.viewer.min_scale, 0.5);
        assert_eq!(config.viewer.wheel_sensitivity, 0.002);
        assert_eq!(
            config.acquisition_options().document_extensions,
            vec!["md", "markdown"]
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: DeckConfig = toml::from_str("").unwrap();
        assert_eq!(config, DeckConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_scale_range_rejected() {
        let mut config = DeckConfig::default();
        config.viewer.min_scale = 2.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidViewer(_))));

        let mut config = DeckConfig::default();
        config.viewer.zoom_out_factor = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidViewer(_))));
    }

    #[test]
    fn test_invalid_sensitivity_rejected() {
        let config: DeckConfig = toml::from_str("[viewer]\nwheel_sensitivity = nan\n").unwrap();
        assert!(config.viewer.wheel_sensitivity.is_nan());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidViewer(_))));

        for value in ["0.0", "-0.001", "inf"] {
            let text = format!("[viewer]\nwheel_sensitivity = {}\n", value);
            let config: DeckConfig = toml::from_str(&text).unwrap();
            assert!(config.validate().is_err(), "accepted {}", value);
        }

        let config: DeckConfig = toml::from_str("[viewer]\nmax_scale = inf\n").unwrap();
        assert!(config.validate().is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[viewer]\nwheel_sensitivity = nan\n").unwrap();
        assert!(matches!(
            DeckConfig::load(&path),
            Err(ConfigError::InvalidViewer(_))
        ));
    }

    #[test]
    fn test_load_from_dir_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeckConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config, DeckConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = DeckConfig {
            title: Some("Saved".to_string()),
            ..DeckConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(DeckConfig::load_from_dir(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_load_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "title = [").unwrap();
        assert!(matches!(DeckConfig::load(&path), Err(ConfigError::Parse { .. })));
    }
}
