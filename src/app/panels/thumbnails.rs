//! Paged thumbnail strip

use crate::app::events::{ControlId, EventBus, GalleryEvent};
use crate::constants;
use crate::gallery::{PreviewImage, ThumbnailCarousel};
use crate::theme::{colors, dimensions};
use egui::{Color32, RichText};
use std::collections::HashMap;

/// Preview textures by scene ID
#[derive(Default)]
pub struct PreviewCache {
    textures: HashMap<String, egui::TextureHandle>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ctx: &egui::Context, scene_id: &str, image: PreviewImage) {
        let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size, &image.rgba);
        let texture = ctx.load_texture(
            format!("preview-{}", scene_id),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.textures.insert(scene_id.to_string(), texture);
    }

    pub fn get(&self, scene_id: &str) -> Option<&egui::TextureHandle> {
        self.textures.get(scene_id)
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

pub fn show(
    ui: &mut egui::Ui,
    carousel: &ThumbnailCarousel,
    previews: &PreviewCache,
    bus: &mut EventBus,
) {
    if carousel.total() == 0 {
        ui.label(RichText::new("No scenes found").italics().color(colors().muted_text));
        return;
    }

    ui.horizontal(|ui| {
        if ui
            .add_enabled(carousel.can_go_previous(), egui::Button::new("◀"))
            .clicked()
        {
            bus.emit(ControlId::Thumbnails, GalleryEvent::PreviousPage);
        }

        for scene in carousel.visible() {
            let active = carousel.is_active(&scene.id);
            let response = ui
                .vertical(|ui| {
                    ui.set_width(dimensions().thumbnail_size.x);
                    let tile = thumbnail_tile(ui, previews.get(&scene.id), active);
                    ui.label(RichText::new(&scene.title).strong());
                    ui.label(RichText::new(&scene.description).small().color(colors().muted_text));
                    tile
                })
                .inner;
            if response.clicked() {
                bus.emit(ControlId::Thumbnails, GalleryEvent::LoadScene(scene.id.clone()));
            }
        }

        if ui
            .add_enabled(carousel.can_go_next(), egui::Button::new("▶"))
            .clicked()
        {
            bus.emit(ControlId::Thumbnails, GalleryEvent::NextPage);
        }
    });
}

/// Largest rect with the image's aspect ratio that fits in `tile`, centered
fn fit_rect(tile: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return tile;
    }
    let scale = (tile.width() / image_size.x).min(tile.height() / image_size.y);
    egui::Rect::from_center_size(tile.center(), image_size * scale)
}

fn thumbnail_tile(
    ui: &mut egui::Ui,
    texture: Option<&egui::TextureHandle>,
    active: bool,
) -> egui::Response {
    let size = dimensions().thumbnail_size;
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let painter = ui.painter();

    match texture {
        Some(texture) => {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.rect_filled(rect, 4.0, colors().placeholder_background);
            painter.image(texture.id(), fit_rect(rect, texture.size_vec2()), uv, Color32::WHITE);
        }
        None => {
            painter.rect_filled(rect, 4.0, colors().placeholder_background);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                constants::carousel::PLACEHOLDER_TEXT,
                egui::FontId::proportional(14.0),
                colors().placeholder_text,
            );
        }
    }

    let stroke = if active {
        egui::Stroke::new(dimensions().thumbnail_active_border_width, colors().thumbnail_active)
    } else {
        egui::Stroke::new(dimensions().thumbnail_border_width, colors().thumbnail_border)
    };
    painter.rect_stroke(rect, 4.0, stroke, egui::StrokeKind::Inside);

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2, Rect};

    #[test]
    fn test_fit_rect_keeps_aspect_ratio() {
        let tile = Rect::from_min_size(pos2(10.0, 20.0), vec2(200.0, 100.0));

        // Wider than the tile: full width, centered vertically
        let wide = fit_rect(tile, vec2(400.0, 100.0));
        assert_eq!(wide.width(), 200.0);
        assert_eq!(wide.height(), 50.0);
        assert_eq!(wide.center(), tile.center());
        assert_eq!(wide.min.y, 45.0);

        // Taller than the tile: full height, centered horizontally
        let tall = fit_rect(tile, vec2(50.0, 100.0));
        assert_eq!(tall.size(), vec2(50.0, 100.0));
        assert_eq!(tall.min.x, 85.0);

        assert_eq!(fit_rect(tile, vec2(400.0, 200.0)), tile);
        assert_eq!(fit_rect(tile, vec2(0.0, 0.0)), tile);
    }
}
