//! Error types for scene loading and configuration

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("failed to read scene descriptor {path}: {source}")]
    DescriptorRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene descriptor {path}: {source}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read model {path}: {source}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode model for scene {scene_id}: {source}")]
    ModelDecode {
        scene_id: String,
        #[source]
        source: gltf::Error,
    },

    #[error("model for scene {scene_id} requires unsupported extension {extension}")]
    UnsupportedExtension { scene_id: String, extension: String },

    #[error("failed to decode compressed geometry of {mesh} in scene {scene_id}: {reason}")]
    DracoDecode {
        scene_id: String,
        mesh: String,
        reason: String,
    },

    #[error("model for scene {scene_id} has a primitive without positions ({mesh})")]
    MissingPositions { scene_id: String, mesh: String },

    #[error("failed to decode preview {path}: {source}")]
    PreviewDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = GalleryError> = std::result::Result<T, E>;
