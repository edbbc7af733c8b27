//! GLB model loading
//!
//! Decodes a binary glTF asset and flattens its default scene into
//! world-space [`MeshNode`]s.

use super::{Material, MeshNode, MeshVertex, SceneModel, TextureImage};
use crate::error::{GalleryError, Result};
use draco_oxide::core::types::{PointIdx, Vector};
use draco_oxide::{Attribute, AttributeType, ComponentDataType, NdVector};
use glam::{Mat3, Mat4, Vec3};
use gltf::image::Format;
use gltf::mesh::Mode;
use log::{debug, info, warn};
use serde_json::Value;

/// Compressed-geometry extension decoded here rather than by the glTF reader
pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Characters dropped from node names
const RESERVED_NAME_CHARS: &[char] = &['[', ']', '.', ':', '/'];

/// Whitespace becomes `_`, reserved characters are removed
pub fn sanitize_node_name(name: &str) -> String {
    name.chars()
        .filter(|c| !RESERVED_NAME_CHARS.contains(c))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Name of the node produced for one primitive
fn primitive_node_name(
    node: &gltf::Node,
    mesh: &gltf::Mesh,
    primitive_index: usize,
    primitive_count: usize,
) -> String {
    let mesh_name = sanitize_node_name(
        &mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index())),
    );

    if primitive_count > 1 {
        return format!("{}_{}", mesh_name, primitive_index);
    }

    match node.name() {
        Some(name) => sanitize_node_name(name),
        None => mesh_name,
    }
}

/// Asset data the node walk reads from
struct ModelData<'a> {
    scene_id: &'a str,
    document: &'a gltf::Document,
    buffers: &'a [gltf::buffer::Data],
    textures: &'a [Option<TextureImage>],
}

/// Loads a GLB byte buffer into a [`SceneModel`]
///
/// Primitives compressed with `KHR_draco_mesh_compression` are decoded with
/// draco-oxide; every other required extension must be one the glTF crate
/// understands.
pub fn load_glb(scene_id: &str, bytes: &[u8]) -> Result<SceneModel> {
    let decode_error = |source: gltf::Error| GalleryError::ModelDecode {
        scene_id: scene_id.to_string(),
        source,
    };

    let gltf::Gltf { document, blob } =
        gltf::Gltf::from_slice_without_validation(bytes).map_err(decode_error)?;
    let mut root = document.into_json();
    root.extensions_required.retain(|ext| ext != DRACO_EXTENSION);
    if let Some(extension) = root
        .extensions_required
        .iter()
        .find(|ext| !gltf::json::extensions::ENABLED_EXTENSIONS.contains(&ext.as_str()))
    {
        return Err(GalleryError::UnsupportedExtension {
            scene_id: scene_id.to_string(),
            extension: extension.clone(),
        });
    }

    let document = gltf::Document::from_json(root).map_err(decode_error)?;
    let buffers = gltf::import_buffers(&document, None, blob).map_err(decode_error)?;
    let textures: Vec<Option<TextureImage>> = gltf::import_images(&document, None, &buffers)
        .map_err(decode_error)?
        .into_iter()
        .enumerate()
        .map(|(index, image)| {
            let texture = rgba8_texture(image);
            if texture.is_none() {
                warn!("Ignoring image {} of scene {}: unsupported pixel format", index, scene_id);
            }
            texture
        })
        .collect();

    let data = ModelData {
        scene_id,
        document: &document,
        buffers: &buffers,
        textures: &textures,
    };
    let mut meshes = Vec::new();
    if let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) {
        for node in scene.nodes() {
            collect_node(&data, &node, Mat4::IDENTITY, &mut meshes)?;
        }
    } else {
        warn!("Model for scene {} has no scenes", scene_id);
    }

    info!(
        "Loaded model for scene {} with {} mesh nodes and {} textures",
        scene_id,
        meshes.len(),
        textures.iter().flatten().count()
    );
    Ok(SceneModel::new(scene_id, meshes).with_textures(textures))
}

fn collect_node(
    data: &ModelData<'_>,
    node: &gltf::Node,
    parent: Mat4,
    meshes: &mut Vec<MeshNode>,
) -> Result<()> {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let primitive_count = mesh.primitives().len();
        for (primitive_index, primitive) in mesh.primitives().enumerate() {
            let name = primitive_node_name(node, &mesh, primitive_index, primitive_count);
            if primitive.mode() != Mode::Triangles {
                warn!("Skipping non-triangle primitive {} ({:?})", name, primitive.mode());
                continue;
            }
            meshes.push(build_mesh_node(data, name, &primitive, world)?);
        }
    }

    for child in node.children() {
        collect_node(data, &child, world, meshes)?;
    }
    Ok(())
}

/// Primitive attributes in the mesh's local space
#[derive(Debug)]
struct PrimitiveGeometry {
    positions: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
    tex_coords: Option<Vec<[f32; 2]>>,
    indices: Option<Vec<u32>>,
}

fn build_mesh_node(
    data: &ModelData<'_>,
    name: String,
    primitive: &gltf::Primitive,
    world: Mat4,
) -> Result<MeshNode> {
    let geometry = match primitive.extension_value(DRACO_EXTENSION) {
        Some(extension) => {
            debug!("Decoding compressed primitive {}", name);
            read_draco_geometry(data, extension).map_err(|reason| GalleryError::DracoDecode {
                scene_id: data.scene_id.to_string(),
                mesh: name.clone(),
                reason,
            })?
        }
        None => read_geometry(data, primitive),
    };

    if geometry.positions.is_empty() {
        return Err(GalleryError::MissingPositions {
            scene_id: data.scene_id.to_string(),
            mesh: name,
        });
    }

    let positions: Vec<Vec3> = geometry
        .positions
        .iter()
        .map(|p| world.transform_point3(*p))
        .collect();

    let indices = geometry
        .indices
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let normals = match geometry.normals {
        Some(normals) => {
            let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
            normals
                .into_iter()
                .map(|n| (normal_matrix * n).normalize_or_zero())
                .collect()
        }
        None => {
            debug!("Computing normals for {}", name);
            vertex_normals(&positions, &indices)
        }
    };
    let tex_coords = geometry.tex_coords.unwrap_or_default();

    let vertices = positions
        .iter()
        .zip(normals.iter().chain(std::iter::repeat(&Vec3::Y)))
        .zip(tex_coords.iter().chain(std::iter::repeat(&[0.0, 0.0])))
        .map(|((position, normal), uv)| MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: *uv,
        })
        .collect();

    let pbr = primitive.material().pbr_metallic_roughness();
    let base_color_texture = pbr.base_color_texture().and_then(|info| {
        if info.tex_coord() != 0 {
            warn!("{} uses TEXCOORD_{} for its base color, only set 0 is read", name, info.tex_coord());
        }
        let image = info.texture().source().index();
        data.textures.get(image)?.as_ref().map(|_| image)
    });
    let material = Material {
        base_color: pbr.base_color_factor(),
        base_color_texture,
        ..Material::default()
    };

    Ok(MeshNode::new(name, vertices, indices).with_material(material))
}

fn read_geometry(data: &ModelData<'_>, primitive: &gltf::Primitive) -> PrimitiveGeometry {
    let reader =
        primitive.reader(|buffer| data.buffers.get(buffer.index()).map(|d| d.0.as_slice()));
    PrimitiveGeometry {
        positions: reader
            .read_positions()
            .map(|positions| positions.map(Vec3::from).collect())
            .unwrap_or_default(),
        normals: reader
            .read_normals()
            .map(|normals| normals.map(Vec3::from).collect()),
        tex_coords: reader
            .read_tex_coords(0)
            .map(|coords| coords.into_f32().collect()),
        indices: reader.read_indices().map(|indices| indices.into_u32().collect()),
    }
}

/// Decodes the Draco stream a primitive's extension object points at
fn read_draco_geometry(
    data: &ModelData<'_>,
    extension: &Value,
) -> std::result::Result<PrimitiveGeometry, String> {
    let view_index = extension
        .get("bufferView")
        .and_then(Value::as_u64)
        .ok_or("extension has no bufferView")? as usize;
    let view = data
        .document
        .views()
        .nth(view_index)
        .ok_or_else(|| format!("bufferView {} does not exist", view_index))?;
    let buffer = data
        .buffers
        .get(view.buffer().index())
        .ok_or_else(|| format!("buffer {} was not loaded", view.buffer().index()))?;
    let bytes = buffer
        .0
        .get(view.offset()..view.offset() + view.length())
        .ok_or_else(|| format!("bufferView {} exceeds its buffer", view_index))?;

    let mesh = draco_oxide::decode::Decoder::new()
        .decode_mesh(bytes)
        .map_err(|e| e.to_string())?;

    let attribute =
        |semantic: &str, kind: AttributeType| draco_attribute(&mesh, extension, semantic, kind);

    let position = attribute("POSITION", AttributeType::Position)
        .ok_or("stream has no POSITION attribute")?;
    let point_count = position.len();
    let positions = draco_values::<3>(position, point_count)
        .ok_or("POSITION is not a float vec3")?
        .into_iter()
        .map(Vec3::from)
        .collect();
    let normals = attribute("NORMAL", AttributeType::Normal)
        .and_then(|normal| draco_values::<3>(normal, point_count))
        .map(|normals| normals.into_iter().map(Vec3::from).collect());
    let tex_coords = attribute("TEXCOORD_0", AttributeType::TextureCoordinate)
        .and_then(|uv| draco_values::<2>(uv, point_count));
    let indices = mesh
        .faces
        .iter()
        .flat_map(|face| face.iter().map(|&point| usize::from(point) as u32))
        .collect();

    Ok(PrimitiveGeometry {
        positions,
        normals,
        tex_coords,
        indices: Some(indices),
    })
}

/// Looks up the attribute the extension maps `semantic` to. Ids are matched
/// first, then the attribute type for encoders that number attributes differently.
fn draco_attribute<'m>(
    mesh: &'m draco_oxide::Mesh,
    extension: &Value,
    semantic: &str,
    kind: AttributeType,
) -> Option<&'m Attribute> {
    let id = extension["attributes"].get(semantic)?.as_u64()? as usize;
    mesh.attributes
        .iter()
        .find(|a| a.get_id().as_usize() == id)
        .or_else(|| mesh.attributes.iter().find(|a| a.get_attribute_type() == kind))
}

/// Per-point float values of a decoded attribute, `None` on a layout mismatch
fn draco_values<const N: usize>(attribute: &Attribute, point_count: usize) -> Option<Vec<[f32; N]>>
where
    NdVector<N, f32>: Vector<N, Component = f32>,
{
    if attribute.get_component_type() != ComponentDataType::F32
        || attribute.get_num_components() != N
        || attribute.len() < point_count
    {
        return None;
    }
    Some(
        (0..point_count)
            .map(|point| {
                let value = attribute.get::<NdVector<N, f32>, N>(PointIdx::from(point));
                std::array::from_fn(|i| *value.get(i))
            })
            .collect(),
    )
}

/// Expands a decoded image to RGBA8, 16-bit channels keep their high byte
fn rgba8_texture(image: gltf::image::Data) -> Option<TextureImage> {
    let channels = match image.format {
        Format::R8 | Format::R16 => 1,
        Format::R8G8 | Format::R16G16 => 2,
        Format::R8G8B8 | Format::R16G16B16 => 3,
        Format::R8G8B8A8 | Format::R16G16B16A16 => 4,
        Format::R32G32B32FLOAT | Format::R32G32B32A32FLOAT => return None,
    };
    let wide = matches!(
        image.format,
        Format::R16 | Format::R16G16 | Format::R16G16B16 | Format::R16G16B16A16
    );
    let samples: Vec<u8> = if wide {
        image
            .pixels
            .chunks_exact(2)
            .map(|c| (u16::from_ne_bytes([c[0], c[1]]) >> 8) as u8)
            .collect()
    } else {
        image.pixels
    };

    let rgba: Vec<u8> = samples
        .chunks_exact(channels)
        .flat_map(|px| match *px {
            [l] => [l, l, l, 255],
            [r, g] => [r, g, 0, 255],
            [r, g, b] => [r, g, b, 255],
            [r, g, b, a] => [r, g, b, a],
            _ => [0, 0, 0, 255],
        })
        .collect();
    if rgba.len() != image.width as usize * image.height as usize * 4 {
        return None;
    }

    Some(TextureImage {
        width: image.width,
        height: image.height,
        rgba: rgba.into(),
    })
}

/// Area-weighted vertex normals accumulated from triangle faces
fn vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
