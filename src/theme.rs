//! Centralized theme and styling constants for the scene gallery
//!
//! This module provides a single source of truth for the colors and
//! dimensions the panels draw with.

use crate::constants;
use egui::{Color32, Vec2};

/// Color palette for the gallery
pub struct Colors {
    // Viewport
    pub viewport_background: Color32,
    pub hover_label_background: Color32,
    pub hover_label_text: Color32,

    // Thumbnails
    pub placeholder_background: Color32,
    pub placeholder_text: Color32,
    pub thumbnail_border: Color32,
    pub thumbnail_active: Color32,

    // Info panel cards
    pub card_background: Color32,
    pub card_selected: Color32,
    pub card_selected_border: Color32,
    pub card_border: Color32,
    pub badge_text: Color32,
    pub cluster_tag: Color32,
    pub muted_text: Color32,

    // Status line
    pub error_text: Color32,
    pub loading_text: Color32,
}

impl Colors {
    /// Get the default color palette
    pub fn default() -> Self {
        let [r, g, b] = constants::lighting::BACKGROUND;
        Self {
            viewport_background: Color32::from_rgb(r, g, b),
            hover_label_background: Color32::from_rgba_unmultiplied(0, 0, 0, 200),
            hover_label_text: Color32::WHITE,

            placeholder_background: Color32::from_rgb(0xf0, 0xf0, 0xf0),
            placeholder_text: Color32::from_rgb(0x99, 0x99, 0x99),
            thumbnail_border: Color32::from_rgb(0xdd, 0xdd, 0xdd),
            thumbnail_active: Color32::from_rgb(0x00, 0x7b, 0xff),

            card_background: Color32::from_rgb(0xfa, 0xfa, 0xfa),
            card_selected: Color32::from_rgb(0xe8, 0xf4, 0xfd),
            card_selected_border: Color32::from_rgb(0x32, 0x73, 0xdc),
            card_border: Color32::from_rgb(0xe0, 0xe0, 0xe0),
            badge_text: Color32::WHITE,
            cluster_tag: Color32::from_rgb(0x17, 0xa2, 0xb8),
            muted_text: Color32::from_rgb(0x6c, 0x75, 0x7d),

            error_text: Color32::from_rgb(0xff, 0x38, 0x60),
            loading_text: Color32::from_rgb(0x6c, 0x75, 0x7d),
        }
    }
}

/// Dimension constants for the gallery
pub struct Dimensions {
    pub thumbnail_size: Vec2,
    pub thumbnail_border_width: f32,
    pub thumbnail_active_border_width: f32,

    pub card_rounding: f32,
    pub card_margin: f32,
    pub badge_rounding: f32,

    pub info_panel_width: f32,
}

impl Dimensions {
    /// Get the default dimensions
    pub fn default() -> Self {
        Self {
            thumbnail_size: Vec2::from(constants::carousel::THUMBNAIL_SIZE),
            thumbnail_border_width: 1.0,
            thumbnail_active_border_width: 3.0,

            card_rounding: constants::ui::DEFAULT_FRAME_ROUNDING,
            card_margin: constants::ui::DEFAULT_FRAME_MARGIN,
            badge_rounding: 10.0,

            info_panel_width: constants::ui::INFO_PANEL_WIDTH,
        }
    }
}

/// Complete theme containing all styling constants
pub struct Theme {
    pub colors: Colors,
    pub dimensions: Dimensions,
}

impl Theme {
    /// Get the default theme
    pub fn default() -> Self {
        Self {
            colors: Colors::default(),
            dimensions: Dimensions::default(),
        }
    }
}

/// Global theme instance
static GLOBAL_THEME: std::sync::LazyLock<Theme> = std::sync::LazyLock::new(Theme::default);

/// Get the global theme
pub fn theme() -> &'static Theme {
    &GLOBAL_THEME
}

/// Convenience functions for commonly used values
pub fn colors() -> &'static Colors {
    &theme().colors
}

pub fn dimensions() -> &'static Dimensions {
    &theme().dimensions
}

/// Light visuals to match the viewport background
pub fn apply(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals::light());
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(constants::ui::DEFAULT_ELEMENT_SPACING / 2.0, 6.0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_tag_badge_colors() {
        assert_eq!(colors().cluster_tag, Color32::from_rgb(0x17, 0xa2, 0xb8));
        assert_eq!(colors().badge_text, Color32::WHITE);
    }
}
