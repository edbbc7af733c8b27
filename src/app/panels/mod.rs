//! UI panels. Each draws from viewer state and reports user actions as events.

pub mod info;
pub mod thumbnails;
pub mod toolbar;
pub mod viewport;

pub use thumbnails::PreviewCache;
