//! 3D viewport: camera navigation, picking, hover label and the wgpu paint callback

use crate::app::events::{ControlId, EventBus, GalleryEvent};
use crate::app::state::ViewerState;
use crate::gallery::LoadProgress;
use crate::gpu::{GraphicsConfig, SceneFrame, SharedSceneRenderer, ViewportRenderCallback};
use crate::scene::pick;
use crate::theme::colors;
use egui::{Pos2, Rect, RichText};

/// Normalized (0..1) position of `pos` inside `rect`
fn normalized(rect: Rect, pos: Pos2) -> (f32, f32) {
    (
        (pos.x - rect.left()) / rect.width().max(1.0),
        (pos.y - rect.top()) / rect.height().max(1.0),
    )
}

fn mesh_under(state: &ViewerState, rect: Rect, pos: Pos2) -> Option<usize> {
    let model = state.model.as_ref()?;
    let (x, y) = normalized(rect, pos);
    let (origin, direction) = state.camera.screen_to_ray(x, y);
    pick(model, origin, direction).map(|hit| hit.mesh_index)
}

pub fn show(
    ui: &mut egui::Ui,
    state: &mut ViewerState,
    renderer: &SharedSceneRenderer,
    graphics: GraphicsConfig,
    bus: &mut EventBus,
    loading: bool,
    progress: Option<&LoadProgress>,
) {
    let rect = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
    state.camera.set_aspect(rect.width() / rect.height().max(1.0));

    // Navigation
    if response.dragged_by(egui::PointerButton::Primary) {
        state.animator.cancel();
        let delta = response.drag_delta();
        state.camera.orbit(delta.x, delta.y);
    } else if response.dragged_by(egui::PointerButton::Secondary)
        || response.dragged_by(egui::PointerButton::Middle)
    {
        state.animator.cancel();
        let delta = response.drag_delta();
        state.camera.pan(delta.x, delta.y, rect.height());
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            state.animator.cancel();
            state.camera.zoom(scroll);
        }
    }

    // Picking
    state.hovered = response
        .hover_pos()
        .and_then(|pos| mesh_under(state, rect, pos));
    if response.clicked() {
        let hit = response
            .interact_pointer_pos()
            .and_then(|pos| mesh_under(state, rect, pos));
        bus.emit(ControlId::Viewport, GalleryEvent::PickMesh(hit));
    }

    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, colors().viewport_background);
    let frame = SceneFrame::capture(&state.camera, state.model.as_ref());
    painter.add(egui_wgpu::Callback::new_paint_callback(
        rect,
        ViewportRenderCallback::new(renderer.clone(), graphics, frame),
    ));

    if let (Some(index), Some(pos)) = (state.hovered, response.hover_pos()) {
        let name = state
            .model
            .as_ref()
            .and_then(|model| model.mesh(index))
            .and_then(|mesh| mesh.instance_name());
        if let Some(name) = name {
            let galley = painter.layout_no_wrap(
                name.to_string(),
                egui::FontId::proportional(13.0),
                colors().hover_label_text,
            );
            let label_rect = Rect::from_min_size(pos + egui::vec2(12.0, 12.0), galley.size())
                .expand(4.0);
            painter.rect_filled(label_rect, 4.0, colors().hover_label_background);
            painter.galley(label_rect.min + egui::vec2(4.0, 4.0), galley, colors().hover_label_text);
        }
    }

    if loading {
        let overlay = Rect::from_center_size(rect.center(), egui::vec2(220.0, 88.0));
        painter.rect_filled(overlay, 8.0, egui::Color32::from_white_alpha(240));
        let mut child = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(overlay)
                .layout(egui::Layout::top_down(egui::Align::Center)),
        );
        child.add_space(10.0);
        child.spinner();
        child.label(RichText::new("Loading 3D Scene...").color(colors().loading_text));
        if let Some(progress) = progress {
            child.label(
                RichText::new(progress.label())
                    .small()
                    .color(colors().loading_text),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_position() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 50.0), egui::vec2(200.0, 100.0));
        assert_eq!(normalized(rect, Pos2::new(200.0, 100.0)), (0.5, 0.5));
        assert_eq!(normalized(rect, rect.min), (0.0, 0.0));
    }
}
