//! Viewer configuration
//!
//! Resolution order is defaults, then the JSON config file, then command
//! line overrides applied by `main`.

use crate::constants;
use crate::error::{GalleryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-control enable flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub viewport: bool,
    pub reset_view: bool,
    pub wireframe: bool,
    pub show_all: bool,
    pub scene_selector: bool,
    pub thumbnails: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            viewport: true,
            reset_view: true,
            wireframe: true,
            show_all: true,
            scene_selector: true,
            thumbnails: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub asset_root: PathBuf,
    pub candidate_ids: Vec<String>,
    pub default_scene: String,
    pub page_size: usize,
    pub controls: ControlsConfig,
    pub window_size: [f32; 2],
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from(constants::assets::DEFAULT_ASSET_ROOT),
            candidate_ids: constants::assets::DEFAULT_CANDIDATE_IDS
                .iter()
                .map(|id| id.to_string())
                .collect(),
            default_scene: constants::assets::DEFAULT_SCENE_ID.to_string(),
            page_size: constants::carousel::PAGE_SIZE,
            controls: ControlsConfig::default(),
            window_size: constants::ui::DEFAULT_WINDOW_SIZE,
        }
    }
}

impl GalleryConfig {
    /// `<config_dir>/scene-gallery/config.json`, when a config dir exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scene-gallery").join("config.json"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GalleryError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| GalleryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the explicit config file, else the per-user one when present,
    /// else defaults. An explicit path that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            log::info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::info!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.controls.viewport {
            return Err(GalleryError::InvalidConfig(
                "the viewport cannot be disabled".to_string(),
            ));
        }
        if self.candidate_ids.is_empty() {
            return Err(GalleryError::InvalidConfig(
                "candidate_ids must list at least one scene ID".to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(GalleryError::InvalidConfig(
                "page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GalleryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.candidate_ids.len(), 10);
        assert_eq!(config.candidate_ids[0], "001");
        assert_eq!(config.candidate_ids[9], "010");
        assert_eq!(config.page_size, 4);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: GalleryConfig = serde_json::from_str(
            r#"{ "asset_root": "/data/scenes", "controls": { "wireframe": false } }"#,
        )
        .unwrap();
        assert_eq!(config.asset_root, PathBuf::from("/data/scenes"));
        assert!(!config.controls.wireframe);
        assert!(config.controls.reset_view);
        assert_eq!(config.default_scene, "001");
    }

    #[test]
    fn test_disabled_viewport_is_rejected() {
        let mut config = GalleryConfig::default();
        config.controls.viewport = false;
        assert!(matches!(
            config.validate(),
            Err(GalleryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_candidates_and_zero_page_rejected() {
        let mut config = GalleryConfig::default();
        config.candidate_ids.clear();
        assert!(config.validate().is_err());

        let mut config = GalleryConfig::default();
        config.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let result = GalleryConfig::load(Some(Path::new("/nonexistent/config.json")));
        assert!(matches!(result, Err(GalleryError::ConfigRead { .. })));
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = GalleryConfig::default();
        config.default_scene = "004".to_string();
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = GalleryConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
