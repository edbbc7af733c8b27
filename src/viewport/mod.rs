//! Viewport camera and camera transitions

pub mod animator;
pub mod camera;

pub use animator::{ease_out_cubic, CameraAnimation, CameraAnimator};
pub use camera::{Camera3D, CameraPose};
