//! Tabbed info panel: objects, task info, reasoning and relations

use crate::app::events::{ControlId, EventBus, GalleryEvent};
use crate::app::state::{InfoTab, TaskLine, ViewerState};
use crate::gallery::object_type::relation_color;
use crate::gallery::{color_for, type_of, ObjectInstance, RelationEntry, SceneDescriptor};
use crate::theme::{colors, dimensions};
use egui::{Color32, RichText};
use egui_extras::{Column, TableBuilder};

pub fn show(ui: &mut egui::Ui, state: &mut ViewerState, bus: &mut EventBus) {
    task_line(ui, state);
    ui.separator();

    ui.horizontal(|ui| {
        for tab in InfoTab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.label());
        }
    });
    ui.separator();

    let Some(descriptor) = state.descriptor.as_ref() else {
        ui.label(RichText::new("No scene loaded").color(colors().muted_text).italics());
        return;
    };

    match state.tab {
        InfoTab::Objects => {
            let selected = state.selected_instance().map(str::to_string);
            let scroll = std::mem::take(&mut state.scroll_to_selection);
            objects_tab(ui, descriptor, selected.as_deref(), scroll, bus);
        }
        InfoTab::TaskInfo => task_info_tab(ui, descriptor),
        InfoTab::Reasoning => reasoning_tab(ui, descriptor),
        InfoTab::Relations => relations_tab(ui, descriptor),
    }
}

fn task_line(ui: &mut egui::Ui, state: &ViewerState) {
    match state.task_line() {
        TaskLine::Task(text) => {
            ui.label(RichText::new(text).strong());
        }
        TaskLine::Error(text) => {
            ui.label(RichText::new(text).color(colors().error_text));
        }
    }
    if let (Some(scene), Some(loaded_at)) = (&state.current_scene, state.loaded_at) {
        ui.label(
            RichText::new(format!(
                "Scene {} · loaded at {}",
                scene,
                loaded_at.format("%H:%M:%S")
            ))
            .small()
            .color(colors().muted_text),
        );
    }
}

fn badge(ui: &mut egui::Ui, text: &str, fill: Color32) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(dimensions().badge_rounding)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(colors().badge_text));
        });
}

/// Cluster tags share one badge color, unlike per-object type badges
fn cluster_badges(descriptor: &SceneDescriptor) -> impl Iterator<Item = (&str, Color32)> {
    descriptor
        .cluster_tags()
        .iter()
        .map(|tag| (tag.as_str(), colors().cluster_tag))
}

fn objects_tab(
    ui: &mut egui::Ui,
    descriptor: &SceneDescriptor,
    selected: Option<&str>,
    scroll_to_selection: bool,
    bus: &mut EventBus,
) {
    let objects = descriptor.objects();
    ui.label(
        RichText::new(format!("Scene Objects ({})", objects.len()))
            .strong()
            .color(colors().card_selected_border),
    );

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for object in objects {
                let is_selected = selected == Some(object.instance.as_str());
                let response = object_card(ui, object, is_selected);
                if is_selected && scroll_to_selection {
                    response.scroll_to_me(Some(egui::Align::Center));
                }
                if response.clicked() {
                    bus.emit(
                        ControlId::InfoPanel,
                        GalleryEvent::SelectInstance(object.instance.clone()),
                    );
                }
            }
        });
}

fn object_card(ui: &mut egui::Ui, object: &ObjectInstance, selected: bool) -> egui::Response {
    let (fill, stroke) = if selected {
        (colors().card_selected, colors().card_selected_border)
    } else {
        (colors().card_background, colors().card_border)
    };

    let inner = egui::Frame::new()
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, stroke))
        .corner_radius(dimensions().card_rounding)
        .inner_margin(dimensions().card_margin)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(&object.instance).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let object_type = type_of(&object.instance);
                    badge(ui, object_type, color_for(object_type));
                });
            });
            if !object.description.is_empty() {
                ui.label(RichText::new(&object.description).color(colors().muted_text));
            }
            egui::Grid::new(("object_details", &object.instance))
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label(RichText::new("Size (W×D×H):").small().strong());
                    ui.label(RichText::new(object.size_label()).small());
                    ui.end_row();
                    ui.label(RichText::new("Position (X,Y,Z):").small().strong());
                    ui.label(RichText::new(object.position_label()).small());
                    ui.end_row();
                    ui.label(RichText::new("Z-Rotation:").small().strong());
                    ui.label(RichText::new(object.rotation_label()).small());
                    ui.end_row();
                });
        });
    ui.add_space(6.0);

    let response = ui.interact(
        inner.response.rect,
        ui.id().with(("object_card", &object.instance)),
        egui::Sense::click(),
    );
    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::new()
        .fill(colors().card_background)
        .corner_radius(dimensions().card_rounding)
        .inner_margin(dimensions().card_margin)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).strong());
            add_contents(ui);
        });
    ui.add_space(6.0);
}

fn task_info_tab(ui: &mut egui::Ui, descriptor: &SceneDescriptor) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        section(ui, "Environment:", |ui| {
            ui.label(
                descriptor
                    .environment()
                    .unwrap_or("No environment description available"),
            );
        });
        section(ui, "Task:", |ui| {
            ui.label(descriptor.task().unwrap_or("No task description available"));
        });
        section(ui, "Goals:", |ui| {
            let goals = descriptor.goals();
            if goals.is_empty() {
                ui.label("• No goals specified");
            }
            for goal in goals {
                ui.label(format!("• {}", goal));
            }
        });
        section(ui, "Object Types:", |ui| {
            ui.horizontal_wrapped(|ui| {
                for (tag, fill) in cluster_badges(descriptor) {
                    badge(ui, tag, fill);
                }
            });
        });
    });
}

fn reasoning_tab(ui: &mut egui::Ui, descriptor: &SceneDescriptor) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        section(ui, "Scene Reasoning", |ui| {
            ui.label(
                descriptor
                    .reasoning()
                    .unwrap_or("No reasoning information available"),
            );
        });
    });
}

fn relations_tab(ui: &mut egui::Ui, descriptor: &SceneDescriptor) {
    let Some(relations) = descriptor.relations().filter(|r| !r.is_empty()) else {
        ui.label(
            RichText::new("No spatial relations available")
                .italics()
                .color(colors().muted_text),
        );
        return;
    };
    let entries: Vec<RelationEntry> = relations
        .iter()
        .map(|text| RelationEntry::from_text(text))
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Subject");
            });
            header.col(|ui| {
                ui.strong("Relation");
            });
            header.col(|ui| {
                ui.strong("Object");
            });
        })
        .body(|mut body| {
            for entry in &entries {
                body.row(20.0, |mut row| match entry {
                    RelationEntry::Parsed(relation) => {
                        row.col(|ui| {
                            ui.label(RichText::new(&relation.subject).strong());
                        });
                        row.col(|ui| {
                            ui.label(
                                RichText::new(&relation.predicate)
                                    .color(relation_color(&relation.predicate)),
                            );
                        });
                        row.col(|ui| {
                            ui.label(RichText::new(&relation.object).strong());
                        });
                    }
                    RelationEntry::Raw(text) => {
                        row.col(|ui| {
                            ui.label(
                                RichText::new(text)
                                    .monospace()
                                    .color(colors().muted_text),
                            );
                        });
                        row.col(|_| {});
                        row.col(|_| {});
                    }
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_badges_use_tag_color() {
        let descriptor: SceneDescriptor = serde_json::from_value(serde_json::json!({
            "input_task_description": { "Objects cluster": ["desk", "lamp", "mug"] }
        }))
        .unwrap();
        let badges: Vec<(&str, Color32)> = cluster_badges(&descriptor).collect();
        assert_eq!(
            badges.iter().map(|(tag, _)| *tag).collect::<Vec<_>>(),
            vec!["desk", "lamp", "mug"]
        );
        assert!(badges.iter().all(|(_, fill)| *fill == colors().cluster_tag));
        assert_ne!(colors().cluster_tag, color_for("desk"));
    }
}
