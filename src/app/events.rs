//! Event bus between widgets and the controller
//!
//! Widgets never mutate viewer state directly. They emit a [`GalleryEvent`]
//! tagged with the [`ControlId`] that produced it; events from disabled
//! controls are dropped at emission so the feature is simply unavailable.

use crate::config::ControlsConfig;
use std::collections::HashMap;
use std::path::PathBuf;

/// Identity of a UI control that can emit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Viewport,
    ResetView,
    WireframeToggle,
    ShowAll,
    SceneSelector,
    Thumbnails,
    InfoPanel,
    Menu,
}

impl ControlId {
    pub const ALL: [ControlId; 8] = [
        ControlId::Viewport,
        ControlId::ResetView,
        ControlId::WireframeToggle,
        ControlId::ShowAll,
        ControlId::SceneSelector,
        ControlId::Thumbnails,
        ControlId::InfoPanel,
        ControlId::Menu,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    LoadScene(String),
    /// Viewport click; `None` when nothing interactive was hit
    PickMesh(Option<usize>),
    /// Object card click
    SelectInstance(String),
    ResetView,
    ToggleWireframe,
    ShowAll,
    PreviousPage,
    NextPage,
    OpenGallery(PathBuf),
}

/// Routing table plus the queue of events emitted during this frame
#[derive(Debug, Clone)]
pub struct EventBus {
    enabled: HashMap<ControlId, bool>,
    queue: Vec<GalleryEvent>,
}

impl EventBus {
    pub fn new(controls: &ControlsConfig) -> Self {
        let enabled = ControlId::ALL
            .into_iter()
            .map(|control| {
                let on = match control {
                    ControlId::Viewport => controls.viewport,
                    ControlId::ResetView => controls.reset_view,
                    ControlId::WireframeToggle => controls.wireframe,
                    ControlId::ShowAll => controls.show_all,
                    ControlId::SceneSelector => controls.scene_selector,
                    ControlId::Thumbnails => controls.thumbnails,
                    ControlId::InfoPanel | ControlId::Menu => true,
                };
                (control, on)
            })
            .collect();
        Self {
            enabled,
            queue: Vec::new(),
        }
    }

    pub fn is_enabled(&self, control: ControlId) -> bool {
        self.enabled.get(&control).copied().unwrap_or(false)
    }

    /// Queues `event` unless `control` is disabled. Returns whether it was queued.
    pub fn emit(&mut self, control: ControlId, event: GalleryEvent) -> bool {
        if !self.is_enabled(control) {
            log::debug!("Dropped {:?} from disabled control {:?}", event, control);
            return false;
        }
        self.queue.push(event);
        true
    }

    pub fn drain(&mut self) -> Vec<GalleryEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(&ControlsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_controls_route() {
        let mut bus = EventBus::default();
        assert!(bus.emit(ControlId::ResetView, GalleryEvent::ResetView));
        assert!(bus.emit(ControlId::Thumbnails, GalleryEvent::NextPage));
        assert_eq!(
            bus.drain(),
            vec![GalleryEvent::ResetView, GalleryEvent::NextPage]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn test_disabled_control_is_dropped() {
        let controls = ControlsConfig {
            wireframe: false,
            ..ControlsConfig::default()
        };
        let mut bus = EventBus::new(&controls);
        assert!(!bus.is_enabled(ControlId::WireframeToggle));
        assert!(!bus.emit(ControlId::WireframeToggle, GalleryEvent::ToggleWireframe));
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_panel_and_menu_always_enabled() {
        let controls = ControlsConfig {
            reset_view: false,
            wireframe: false,
            show_all: false,
            scene_selector: false,
            thumbnails: false,
            ..ControlsConfig::default()
        };
        let bus = EventBus::new(&controls);
        assert!(bus.is_enabled(ControlId::InfoPanel));
        assert!(bus.is_enabled(ControlId::Menu));
        assert!(bus.is_enabled(ControlId::Viewport));
    }
}
