//! Loaded scene geometry
//!
//! A [`SceneModel`] is the flattened result of loading one scene's model
//! asset: every mesh primitive becomes a [`MeshNode`] with world-space
//! vertices, so picking and bounds never walk a hierarchy.

pub mod loader;
pub mod picking;

pub use loader::{load_glb, sanitize_node_name};
pub use picking::{pick, ray_aabb_intersect, ray_triangle_intersect, PickHit};

use crate::gallery::matcher::{match_instance_index, BindingMap};
use crate::gallery::ObjectInstance;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Emissive color applied to the selected node
pub const HIGHLIGHT_EMISSIVE: [f32; 3] = [0x44 as f32 / 255.0; 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub base_color: [f32; 4],
    /// Index into [`SceneModel::textures`], multiplied with `base_color`
    pub base_color_texture: Option<usize>,
    pub emissive: [f32; 3],
    pub wireframe: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            emissive: [0.0; 3],
            wireframe: false,
        }
    }
}

/// Decoded model image, always 8-bit RGBA
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

/// Axis-aligned bounding box
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |mut bounds, point| {
            bounds.extend(point);
            bounds
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

/// What a mesh node is bound to, plus its material before highlighting
#[derive(Debug, Clone)]
pub struct MeshBinding {
    pub instance_index: usize,
    pub instance: ObjectInstance,
    pub original_material: Material,
}

/// One renderable primitive from the model asset. Geometry is shared with
/// the GPU upload, only the material changes after loading.
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: String,
    pub vertices: Arc<[MeshVertex]>,
    pub indices: Arc<[u32]>,
    pub bounds: Aabb,
    pub material: Material,
    pub binding: Option<MeshBinding>,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points(vertices.iter().map(|v| Vec3::from(v.position)));
        Self {
            name: name.into(),
            vertices: vertices.into(),
            indices: indices.into(),
            bounds,
            material: Material::default(),
            binding: None,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Only bound nodes take part in picking and highlighting
    pub fn is_interactive(&self) -> bool {
        self.binding.is_some()
    }

    pub fn instance_name(&self) -> Option<&str> {
        self.binding
            .as_ref()
            .map(|binding| binding.instance.instance.as_str())
    }

    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let a = self.vertices.get(tri[0] as usize)?;
            let b = self.vertices.get(tri[1] as usize)?;
            let c = self.vertices.get(tri[2] as usize)?;
            Some([
                Vec3::from(a.position),
                Vec3::from(b.position),
                Vec3::from(c.position),
            ])
        })
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.material.emissive = if highlighted {
            HIGHLIGHT_EMISSIVE
        } else {
            [0.0; 3]
        };
    }

    /// Puts back the material copied when the node was bound
    pub fn restore_material(&mut self) {
        if let Some(binding) = &self.binding {
            let wireframe = self.material.wireframe;
            self.material = binding.original_material;
            self.material.wireframe = wireframe;
        }
    }
}

/// All mesh nodes of one loaded model
#[derive(Debug, Clone)]
pub struct SceneModel {
    pub scene_id: String,
    pub meshes: Vec<MeshNode>,
    /// Indexed like the asset's images; `None` where an image could not be used
    pub textures: Vec<Option<TextureImage>>,
    generation: u64,
}

impl SceneModel {
    pub fn new(scene_id: impl Into<String>, meshes: Vec<MeshNode>) -> Self {
        Self {
            scene_id: scene_id.into(),
            meshes,
            textures: Vec::new(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn with_textures(mut self, textures: Vec<Option<TextureImage>>) -> Self {
        self.textures = textures;
        self
    }

    pub fn texture(&self, index: usize) -> Option<&TextureImage> {
        self.textures.get(index).and_then(Option::as_ref)
    }

    /// Unique per constructed model; the GPU side re-uploads when it changes
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bounds(&self) -> Aabb {
        self.meshes
            .iter()
            .filter(|mesh| !mesh.bounds.is_empty())
            .fold(Aabb::EMPTY, |acc, mesh| acc.union(&mesh.bounds))
    }

    pub fn mesh(&self, index: usize) -> Option<&MeshNode> {
        self.meshes.get(index)
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut MeshNode> {
        self.meshes.get_mut(index)
    }

    /// Binds every mesh to the first instance whose name prefixes the mesh
    /// name and returns the instance → mesh map. Previous bindings are dropped.
    pub fn bind_instances(&mut self, instances: &[ObjectInstance]) -> BindingMap {
        let mut bindings = BindingMap::new();
        for (mesh_index, mesh) in self.meshes.iter_mut().enumerate() {
            mesh.binding = None;
            match match_instance_index(&mesh.name, instances) {
                Some(instance_index) => {
                    let instance = instances[instance_index].clone();
                    log::debug!("Mapped {} to instance {}", mesh.name, instance.instance);
                    bindings.bind(&instance.instance, mesh_index);
                    mesh.binding = Some(MeshBinding {
                        instance_index,
                        instance,
                        original_material: mesh.material,
                    });
                }
                None => {
                    log::warn!("No matching instance found for mesh: {}", mesh.name);
                }
            }
        }
        log::info!(
            "Bound {} of {} meshes to {} instances",
            self.meshes.iter().filter(|m| m.is_interactive()).count(),
            self.meshes.len(),
            bindings.len()
        );
        bindings
    }

    /// Flips the wireframe flag of every mesh
    pub fn toggle_wireframe(&mut self) {
        for mesh in &mut self.meshes {
            mesh.material.wireframe = !mesh.material.wireframe;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Axis-aligned unit-ish box centered at `center`
    pub fn box_mesh(name: &str, center: Vec3, half: f32) -> MeshNode {
        let corners = [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ];
        let vertices = corners
            .iter()
            .map(|c| {
                let offset = Vec3::from(*c);
                MeshVertex {
                    position: (center + offset * half).to_array(),
                    normal: offset.normalize().to_array(),
                    uv: [0.0, 0.0],
                }
            })
            .collect();
        let indices = vec![
            0, 1, 2, 0, 2, 3, // back
            4, 6, 5, 4, 7, 6, // front
            0, 4, 5, 0, 5, 1, // bottom
            3, 2, 6, 3, 6, 7, // top
            0, 3, 7, 0, 7, 4, // left
            1, 5, 6, 1, 6, 2, // right
        ];
        MeshNode::new(name, vertices, indices)
    }

    pub fn instance(name: &str) -> ObjectInstance {
        ObjectInstance {
            instance: name.to_string(),
            description: format!("{} description", name),
            size: [10.0, 10.0, 10.0],
            position: [0.0, 0.0, 0.0],
            z_rotation: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{box_mesh, instance};
    use super::*;

    #[test]
    fn test_bounds_union() {
        let model = SceneModel::new(
            "001",
            vec![
                box_mesh("a", Vec3::ZERO, 1.0),
                box_mesh("b", Vec3::new(10.0, 0.0, 0.0), 1.0),
            ],
        );
        let bounds = model.bounds();
        assert_eq!(bounds.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(11.0, 1.0, 1.0));
        assert_eq!(bounds.center(), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(bounds.size(), Vec3::new(12.0, 2.0, 2.0));
    }

    #[test]
    fn test_empty_model_bounds() {
        let model = SceneModel::new("001", vec![]);
        assert!(model.bounds().is_empty());
        assert_eq!(model.bounds().size(), Vec3::ZERO);
    }

    #[test]
    fn test_bind_instances_marks_interactive() {
        let mut model = SceneModel::new(
            "001",
            vec![
                box_mesh("desk_0_top", Vec3::ZERO, 1.0),
                box_mesh("lamp_0", Vec3::ONE, 1.0),
                box_mesh("floor", Vec3::ZERO, 5.0),
            ],
        );
        let bindings = model.bind_instances(&[instance("desk_0"), instance("lamp_0")]);
        assert_eq!(bindings.mesh_for("desk_0"), Some(0));
        assert_eq!(bindings.mesh_for("lamp_0"), Some(1));
        assert!(model.meshes[0].is_interactive());
        assert!(!model.meshes[2].is_interactive());
        assert_eq!(model.meshes[1].instance_name(), Some("lamp_0"));
    }

    #[test]
    fn test_highlight_and_restore() {
        let mut model = SceneModel::new("001", vec![box_mesh("lamp_0", Vec3::ZERO, 1.0)]);
        model.bind_instances(&[instance("lamp_0")]);
        let mesh = &mut model.meshes[0];
        mesh.set_highlighted(true);
        assert_eq!(mesh.material.emissive, HIGHLIGHT_EMISSIVE);
        mesh.restore_material();
        assert_eq!(mesh.material.emissive, [0.0; 3]);
    }

    #[test]
    fn test_generations_differ() {
        let a = SceneModel::new("001", vec![]);
        let b = SceneModel::new("001", vec![]);
        assert_ne!(a.generation(), b.generation());
    }
}
