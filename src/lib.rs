//! Scene gallery core library
//!
//! Loads scene descriptors and GLB models from an asset directory, binds
//! mesh nodes to described object instances, and presents them in an
//! egui viewer with a wgpu viewport.

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod gallery;
pub mod gpu;
pub mod scene;
pub mod theme;
pub mod viewport;

// Re-export commonly used types
pub use app::GalleryApp;
pub use config::{ControlsConfig, GalleryConfig};
pub use error::{GalleryError, Result};
pub use gallery::{SceneDescriptor, SceneSummary};
pub use scene::{load_glb, SceneModel};
