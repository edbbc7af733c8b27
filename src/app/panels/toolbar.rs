//! Menu bar and viewer controls

use crate::app::events::{ControlId, EventBus, GalleryEvent};
use crate::gallery::ThumbnailCarousel;

pub fn menu_bar(ui: &mut egui::Ui, bus: &mut EventBus) {
    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Open gallery folder…").clicked() {
                ui.close_menu();
                if let Some(path) = rfd::FileDialog::new().pick_folder() {
                    bus.emit(ControlId::Menu, GalleryEvent::OpenGallery(path));
                }
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    });
}

/// Draws the enabled controls. `selector_choice` is the scene picked in
/// the selector but not yet loaded.
pub fn controls(
    ui: &mut egui::Ui,
    carousel: &ThumbnailCarousel,
    selector_choice: &mut Option<String>,
    wireframe: bool,
    bus: &mut EventBus,
) {
    ui.horizontal(|ui| {
        if bus.is_enabled(ControlId::ResetView) && ui.button("⟲ Reset View").clicked() {
            bus.emit(ControlId::ResetView, GalleryEvent::ResetView);
        }

        if bus.is_enabled(ControlId::WireframeToggle) {
            let label = if wireframe { "▣ Solid" } else { "▢ Wireframe" };
            if ui.button(label).clicked() {
                bus.emit(ControlId::WireframeToggle, GalleryEvent::ToggleWireframe);
            }
        }

        if bus.is_enabled(ControlId::ShowAll) && ui.button("⛶ Show All").clicked() {
            bus.emit(ControlId::ShowAll, GalleryEvent::ShowAll);
        }

        if bus.is_enabled(ControlId::SceneSelector) {
            ui.separator();
            let selected_text = selector_choice
                .as_deref()
                .map(|id| format!("Scene {}", id))
                .unwrap_or_else(|| "Select scene".to_string());
            egui::ComboBox::from_id_salt("scene_selector")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for scene in carousel.scenes() {
                        ui.selectable_value(selector_choice, Some(scene.id.clone()), &scene.title);
                    }
                });
            let load = ui.add_enabled(selector_choice.is_some(), egui::Button::new("Load"));
            if load.clicked() {
                if let Some(scene_id) = selector_choice.clone() {
                    bus.emit(ControlId::SceneSelector, GalleryEvent::LoadScene(scene_id));
                }
            }
        }
    });
}
