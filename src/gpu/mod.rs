//! GPU rendering module
//!
//! Draws the loaded scene inside the egui viewport through an egui_wgpu
//! paint callback.
//!
//! ## Architecture
//!
//! - [`config`] - Pipeline settings that must agree with eframe's surface
//! - [`renderer`] - Pipelines, geometry and texture upload, shadow pass, per-node uniforms
//! - [`callback`] - egui paint callback integration
//! - `shaders/` - WGSL shader for lit meshes, wireframe lines and shadow depth

pub mod callback;
pub mod config;
pub mod renderer;

pub use callback::{shared_renderer, SharedSceneRenderer, ViewportRenderCallback};
pub use config::{GraphicsConfig, DEPTH_BUFFER_BITS};
pub use renderer::{SceneFrame, SceneRenderer};
