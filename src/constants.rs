//! Application-wide constants and default values
//!
//! Centralized location for all hard-coded values to improve maintainability

/// Asset layout constants
pub mod assets {
    /// Default directory holding `<id>.json`, `<id>.glb` and `<id>.png`
    pub const DEFAULT_ASSET_ROOT: &str = "./assets/gallery";

    /// Optional listing of scene IDs inside the asset root
    pub const MANIFEST_FILE: &str = "manifest.json";

    /// Scene loaded on startup
    pub const DEFAULT_SCENE_ID: &str = "001";

    /// IDs tried when no manifest is present
    pub const DEFAULT_CANDIDATE_IDS: [&str; 10] = [
        "001", "002", "003", "004", "005", "006", "007", "008", "009", "010",
    ];

    /// Thumbnail descriptions are cut to this many characters
    pub const SUMMARY_MAX_CHARS: usize = 50;

    /// Task text used for summaries when a descriptor has none
    pub const SUMMARY_FALLBACK_TASK: &str = "Tabletop Organization";

    /// Model files are read in chunks of this many bytes, reporting progress after each
    pub const MODEL_READ_CHUNK: usize = 256 * 1024;
}

/// Thumbnail carousel constants
pub mod carousel {
    /// Thumbnails visible at once
    pub const PAGE_SIZE: usize = 4;

    /// Thumbnail tile size in points
    pub const THUMBNAIL_SIZE: [f32; 2] = [200.0, 100.0];

    /// Text drawn when a preview image is unavailable
    pub const PLACEHOLDER_TEXT: &str = "Scene Preview";
}

/// Camera defaults and animation timings
pub mod camera {
    /// Vertical field of view in degrees
    pub const FOV_DEGREES: f32 = 45.0;

    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;

    /// Pose used before any model is loaded
    pub const DEFAULT_POSITION: [f32; 3] = [100.0, 150.0, 200.0];
    pub const DEFAULT_TARGET: [f32; 3] = [100.0, 0.0, 40.0];

    /// Duration of focus / show-all transitions
    pub const ANIMATION_DURATION_MS: u64 = 1000;

    /// Offset applied along each axis when focusing a single object
    pub const FOCUS_OFFSET: f32 = 50.0;

    /// Padding factor applied by reset view
    pub const RESET_PADDING: f32 = 1.05;

    /// Height of the reset view eye above the model center, as a fraction of distance
    pub const RESET_ELEVATION: f32 = 0.3;

    /// Show-all distance as a multiple of the largest model extent
    pub const SHOW_ALL_FACTOR: f32 = 2.0;

    /// Radians of orbit per dragged point
    pub const ORBIT_SENSITIVITY: f32 = 0.01;

    /// Fraction of target distance moved per scrolled point
    pub const ZOOM_SENSITIVITY: f32 = 0.002;
}

/// Scene lighting, matching the three-light studio setup
pub mod lighting {
    pub const AMBIENT_INTENSITY: f32 = 0.6;

    /// Key directional light, shining from this point toward the origin
    pub const KEY_LIGHT_POSITION: [f32; 3] = [200.0, 300.0, 200.0];
    pub const KEY_LIGHT_INTENSITY: f32 = 0.8;

    pub const FILL_LIGHT_POSITION: [f32; 3] = [-200.0, 200.0, -200.0];
    pub const FILL_LIGHT_INTENSITY: f32 = 0.3;

    /// Side length of the key light's square shadow map in texels
    pub const SHADOW_MAP_SIZE: u32 = 2048;

    /// Half-width of the key light's orthographic shadow frustum
    pub const SHADOW_EXTENT: f32 = 300.0;
    pub const SHADOW_NEAR: f32 = 0.1;
    pub const SHADOW_FAR: f32 = 1000.0;

    /// Viewport clear color (#f5f5f5)
    pub const BACKGROUND: [u8; 3] = [0xf5, 0xf5, 0xf5];
}

/// UI spacing and sizing constants
pub mod ui {
    /// Default window size
    pub const DEFAULT_WINDOW_SIZE: [f32; 2] = [1400.0, 900.0];

    /// Width of the info panel on the right
    pub const INFO_PANEL_WIDTH: f32 = 380.0;

    /// Default margin for UI frames
    pub const DEFAULT_FRAME_MARGIN: f32 = 8.0;

    /// Default rounding for UI frames
    pub const DEFAULT_FRAME_ROUNDING: f32 = 6.0;

    /// Default spacing between UI elements
    pub const DEFAULT_ELEMENT_SPACING: f32 = 10.0;
}
