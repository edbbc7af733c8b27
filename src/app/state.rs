//! Viewer state owned by the controller
//!
//! Every mutation of the visible scene goes through [`ViewerState`], so a
//! scene switch always clears the previous model, bindings and selection
//! before installing the next one.

use crate::gallery::{BindingMap, SceneDescriptor, SceneSummary, ThumbnailCarousel};
use crate::scene::SceneModel;
use crate::viewport::{Camera3D, CameraAnimator};
use chrono::{DateTime, Local};
use std::time::Duration;

/// Which view of the info panel is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoTab {
    #[default]
    Objects,
    TaskInfo,
    Reasoning,
    Relations,
}

impl InfoTab {
    pub const ALL: [InfoTab; 4] = [
        InfoTab::Objects,
        InfoTab::TaskInfo,
        InfoTab::Reasoning,
        InfoTab::Relations,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InfoTab::Objects => "Objects",
            InfoTab::TaskInfo => "Task Info",
            InfoTab::Reasoning => "Reasoning",
            InfoTab::Relations => "Relations",
        }
    }
}

/// The task-description line above the info panel
#[derive(Debug, Clone, PartialEq)]
pub enum TaskLine {
    Task(String),
    Error(String),
}

#[derive(Debug)]
pub struct ViewerState {
    pub descriptor: Option<SceneDescriptor>,
    pub model: Option<SceneModel>,
    pub bindings: BindingMap,
    pub selected: Option<usize>,
    pub hovered: Option<usize>,
    pub carousel: ThumbnailCarousel,
    pub tab: InfoTab,
    pub camera: Camera3D,
    pub animator: CameraAnimator,
    pub current_scene: Option<String>,
    pub load_error: Option<String>,
    pub loaded_at: Option<DateTime<Local>>,
    /// Set when a selection should scroll its card into view on the next frame
    pub scroll_to_selection: bool,
}

impl ViewerState {
    pub fn new(page_size: usize) -> Self {
        Self {
            descriptor: None,
            model: None,
            bindings: BindingMap::new(),
            selected: None,
            hovered: None,
            carousel: ThumbnailCarousel::new(page_size),
            tab: InfoTab::default(),
            camera: Camera3D::new(),
            animator: CameraAnimator::new(),
            current_scene: None,
            load_error: None,
            loaded_at: None,
            scroll_to_selection: false,
        }
    }

    pub fn set_scenes(&mut self, scenes: Vec<SceneSummary>) {
        self.carousel.set_scenes(scenes);
    }

    /// Drops the visible model, its bindings and the selection
    pub fn clear_scene(&mut self) {
        self.selected = None;
        self.hovered = None;
        self.bindings.clear();
        self.model = None;
    }

    /// Replaces the visible scene wholesale and frames it
    pub fn install_scene(&mut self, scene_id: &str, descriptor: SceneDescriptor, mut model: SceneModel) {
        self.clear_scene();

        self.bindings = model.bind_instances(descriptor.objects());
        self.model = Some(model);
        self.descriptor = Some(descriptor);
        self.current_scene = Some(scene_id.to_string());
        self.carousel.select(scene_id);
        self.load_error = None;
        self.loaded_at = Some(Local::now());
        self.reset_view();
        log::info!("Scene {} installed", scene_id);
    }

    /// Records a failed load. The visible scene is left as it was.
    pub fn fail_load(&mut self, scene_id: &str, message: String) {
        log::error!("Error loading scene {}: {}", scene_id, message);
        self.load_error = Some(message);
    }

    pub fn task_line(&self) -> TaskLine {
        if let Some(error) = &self.load_error {
            return TaskLine::Error(format!("Error loading scene: {}", error));
        }
        let task = self
            .descriptor
            .as_ref()
            .and_then(|descriptor| descriptor.task())
            .unwrap_or("No task description available");
        TaskLine::Task(task.to_string())
    }

    pub fn selected_instance(&self) -> Option<&str> {
        let index = self.selected?;
        self.model.as_ref()?.mesh(index)?.instance_name()
    }

    /// Highlights one interactive mesh, or clears the selection with `None`.
    /// Non-interactive or unknown indices clear the selection.
    pub fn select_mesh(&mut self, index: Option<usize>) {
        let Some(model) = self.model.as_mut() else {
            self.selected = None;
            return;
        };

        if let Some(previous) = self.selected.take().and_then(|i| model.mesh_mut(i)) {
            previous.restore_material();
            previous.set_highlighted(false);
        }

        if let Some(mesh) = index.and_then(|i| model.mesh_mut(i)) {
            if mesh.is_interactive() {
                mesh.set_highlighted(true);
                self.selected = index;
                self.scroll_to_selection = true;
                log::debug!("Selected {}", mesh.name);
            }
        }
    }

    /// Selects the mesh bound to `instance` and flies the camera to it.
    /// Returns false when the instance has no mesh.
    pub fn select_instance(&mut self, instance: &str) -> bool {
        let Some(index) = self.bindings.mesh_for(instance) else {
            log::debug!("Instance {} has no bound mesh", instance);
            return false;
        };
        self.select_mesh(Some(index));
        self.focus_mesh(index);
        true
    }

    pub fn focus_mesh(&mut self, index: usize) {
        let Some(mesh) = self.model.as_ref().and_then(|model| model.mesh(index)) else {
            return;
        };
        let pose = Camera3D::focus_pose(&mesh.bounds);
        self.animator.animate_to(self.camera.pose(), pose);
    }

    /// Frames the whole model immediately and clears the selection
    pub fn reset_view(&mut self) {
        self.animator.cancel();
        let bounds = self.model.as_ref().map(SceneModel::bounds);
        let pose = self.camera.reset_pose(bounds.as_ref());
        self.camera.set_pose(pose);
        self.select_mesh(None);
    }

    pub fn show_all(&mut self) {
        let Some(bounds) = self
            .model
            .as_ref()
            .map(SceneModel::bounds)
            .filter(|bounds| !bounds.is_empty())
        else {
            return;
        };
        let pose = Camera3D::show_all_pose(&bounds);
        self.animator.animate_to(self.camera.pose(), pose);
    }

    pub fn toggle_wireframe(&mut self) {
        if let Some(model) = self.model.as_mut() {
            model.toggle_wireframe();
        }
    }

    /// Advances the camera animation by one frame
    pub fn tick(&mut self, frame_time: Duration) {
        if let Some(pose) = self.animator.tick(frame_time) {
            self.camera.set_pose(pose);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::test_support::{box_mesh, instance};
    use crate::scene::HIGHLIGHT_EMISSIVE;
    use glam::Vec3;

    fn descriptor(names: &[&str]) -> SceneDescriptor {
        let mut descriptor = SceneDescriptor::default();
        descriptor.scene_layout_json.objects = names.iter().map(|n| instance(n)).collect();
        descriptor.input_task_description.task = Some(format!("Arrange {}", names.join(", ")));
        descriptor
    }

    fn model(names: &[&str]) -> SceneModel {
        let meshes = names
            .iter()
            .enumerate()
            .map(|(i, name)| box_mesh(name, Vec3::new(i as f32 * 10.0, 0.0, 0.0), 1.0))
            .collect();
        SceneModel::new("test", meshes)
    }

    #[test]
    fn test_second_scene_replaces_first() {
        let mut state = ViewerState::new(4);
        state.install_scene("001", descriptor(&["desk_0", "lamp_0"]), model(&["desk_0", "lamp_0_shade"]));
        assert_eq!(state.bindings.len(), 2);
        assert!(state.select_instance("lamp_0"));

        state.install_scene("002", descriptor(&["mug_0"]), model(&["mug_0_body", "desk_0"]));
        assert_eq!(state.bindings.len(), 1);
        assert_eq!(state.bindings.mesh_for("mug_0"), Some(0));
        assert_eq!(state.bindings.mesh_for("desk_0"), None);
        assert_eq!(state.bindings.mesh_for("lamp_0"), None);
        assert!(state.selected.is_none());
        assert_eq!(state.current_scene.as_deref(), Some("002"));
        let model = state.model.as_ref().unwrap();
        assert!(!model.meshes[1].is_interactive());
    }

    #[test]
    fn test_selection_highlight_is_exclusive() {
        let mut state = ViewerState::new(4);
        state.install_scene("001", descriptor(&["a_0", "b_0"]), model(&["a_0", "b_0"]));

        state.select_mesh(Some(0));
        state.select_mesh(Some(1));
        let model = state.model.as_ref().unwrap();
        assert_eq!(model.meshes[0].material.emissive, [0.0; 3]);
        assert_eq!(model.meshes[1].material.emissive, HIGHLIGHT_EMISSIVE);
        assert_eq!(state.selected_instance(), Some("b_0"));

        state.select_mesh(None);
        assert!(state.selected.is_none());
        let model = state.model.as_ref().unwrap();
        assert_eq!(model.meshes[1].material.emissive, [0.0; 3]);
    }

    #[test]
    fn test_unbound_mesh_cannot_be_selected() {
        let mut state = ViewerState::new(4);
        state.install_scene("001", descriptor(&["a_0"]), model(&["a_0", "floor"]));
        state.select_mesh(Some(1));
        assert!(state.selected.is_none());
        assert!(!state.select_instance("missing_0"));
    }

    #[test]
    fn test_card_click_focuses_camera() {
        let mut state = ViewerState::new(4);
        state.install_scene("001", descriptor(&["a_0", "b_0"]), model(&["a_0", "b_0"]));
        assert!(state.select_instance("b_0"));
        assert!(state.animator.is_animating());

        state.tick(Duration::from_secs(2));
        assert!(!state.animator.is_animating());
        assert!((state.camera.target - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        assert!((state.camera.position - Vec3::new(60.0, 50.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn test_failed_load_keeps_scene() {
        let mut state = ViewerState::new(4);
        state.install_scene("001", descriptor(&["a_0"]), model(&["a_0"]));
        state.fail_load("002", "model missing".to_string());

        assert_eq!(state.current_scene.as_deref(), Some("001"));
        assert_eq!(state.bindings.mesh_for("a_0"), Some(0));
        assert_eq!(
            state.task_line(),
            TaskLine::Error("Error loading scene: model missing".to_string())
        );
    }

    #[test]
    fn test_reset_view_without_model_uses_default_pose() {
        let mut state = ViewerState::new(4);
        state.camera.orbit(1.0, 1.0);
        state.reset_view();
        assert_eq!(state.camera.position, Vec3::new(100.0, 150.0, 200.0));
        assert_eq!(
            state.task_line(),
            TaskLine::Task("No task description available".to_string())
        );
    }
}
