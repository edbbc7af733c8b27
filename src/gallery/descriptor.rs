//! Scene descriptor documents
//!
//! One JSON document per scene ID describes the task that produced the scene,
//! the object layout, and the spatial relations between objects.

use serde::{Deserialize, Serialize};

/// One scene's JSON descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    #[serde(default)]
    pub input_task_description: TaskDescription,
    #[serde(default)]
    pub scene_layout_json: SceneLayout,
    #[serde(default)]
    pub reasoning_paragraph: Option<String>,
    #[serde(default)]
    pub scene_graph: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDescription {
    #[serde(rename = "Environment", default)]
    pub environment: Option<String>,
    #[serde(rename = "Task", default)]
    pub task: Option<String>,
    #[serde(rename = "Goal", default)]
    pub goals: Option<Vec<String>>,
    #[serde(rename = "Objects cluster", default)]
    pub objects_cluster: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    #[serde(default)]
    pub objects: Vec<ObjectInstance>,
}

/// A semantic object placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInstance {
    pub instance: String,
    #[serde(default)]
    pub description: String,
    /// Width, depth, height
    pub size: [f32; 3],
    pub position: [f32; 3],
    /// Degrees
    #[serde(default)]
    pub z_rotation: f32,
}

impl SceneDescriptor {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn objects(&self) -> &[ObjectInstance] {
        &self.scene_layout_json.objects
    }

    pub fn task(&self) -> Option<&str> {
        self.input_task_description
            .task
            .as_deref()
            .filter(|task| !task.is_empty())
    }

    pub fn environment(&self) -> Option<&str> {
        self.input_task_description
            .environment
            .as_deref()
            .filter(|env| !env.is_empty())
    }

    pub fn goals(&self) -> &[String] {
        self.input_task_description.goals.as_deref().unwrap_or(&[])
    }

    pub fn cluster_tags(&self) -> &[String] {
        self.input_task_description
            .objects_cluster
            .as_deref()
            .unwrap_or(&[])
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning_paragraph
            .as_deref()
            .filter(|text| !text.is_empty())
    }

    /// Relation strings, or `None` when the descriptor carries no scene graph
    pub fn relations(&self) -> Option<&[String]> {
        self.scene_graph.as_deref()
    }
}

impl ObjectInstance {
    pub fn width(&self) -> f32 {
        self.size[0]
    }

    pub fn depth(&self) -> f32 {
        self.size[1]
    }

    pub fn height(&self) -> f32 {
        self.size[2]
    }

    /// `W × D × H cm` with one decimal
    pub fn size_label(&self) -> String {
        format!(
            "{:.1} × {:.1} × {:.1} cm",
            self.width(),
            self.depth(),
            self.height()
        )
    }

    pub fn position_label(&self) -> String {
        let [x, y, z] = self.position;
        format!("({:.1}, {:.1}, {:.1})", x, y, z)
    }

    pub fn rotation_label(&self) -> String {
        format!("{:.1}°", self.z_rotation)
    }
}
