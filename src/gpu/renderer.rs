//! wgpu renderer for the scene viewport
//!
//! Geometry and textures are uploaded once per loaded model (keyed by the
//! model's generation); materials and camera are rewritten every frame. Each
//! mesh node gets a slot in one dynamic-offset uniform buffer. Before the
//! viewport pass, a depth-only pass renders the key light's shadow map.

use super::config::GraphicsConfig;
use crate::constants::lighting;
use crate::scene::{Material, MeshVertex, SceneModel, TextureImage};
use crate::viewport::Camera3D;
use bytemuck::{Pod, Zeroable};
use eframe::wgpu;
use eframe::wgpu::util::DeviceExt;
use glam::{Mat4, Vec3};
use std::mem;
use std::num::NonZeroU64;
use std::sync::Arc;

const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Orthographic view-projection of the key light, looking at the origin
pub fn key_light_view_projection() -> Mat4 {
    let extent = lighting::SHADOW_EXTENT;
    let projection = Mat4::orthographic_rh(
        -extent,
        extent,
        -extent,
        extent,
        lighting::SHADOW_NEAR,
        lighting::SHADOW_FAR,
    );
    let view = Mat4::look_at_rh(Vec3::from(lighting::KEY_LIGHT_POSITION), Vec3::ZERO, Vec3::Y);
    projection * view
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub key_light: [f32; 4],
    pub fill_light: [f32; 4],
}

impl FrameUniforms {
    pub fn new(view_proj: Mat4, camera_position: Vec3) -> Self {
        let directional = |position: [f32; 3], intensity: f32| {
            let dir = Vec3::from(position).normalize_or_zero();
            [dir.x, dir.y, dir.z, intensity]
        };
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            light_view_proj: key_light_view_projection().to_cols_array_2d(),
            camera_pos: camera_position.extend(1.0).to_array(),
            ambient: Vec3::splat(lighting::AMBIENT_INTENSITY).extend(1.0).to_array(),
            key_light: directional(lighting::KEY_LIGHT_POSITION, lighting::KEY_LIGHT_INTENSITY),
            fill_light: directional(
                lighting::FILL_LIGHT_POSITION,
                lighting::FILL_LIGHT_INTENSITY,
            ),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct NodeUniforms {
    pub base_color: [f32; 4],
    pub emissive: [f32; 4],
}

impl From<&Material> for NodeUniforms {
    fn from(material: &Material) -> Self {
        let [r, g, b] = material.emissive;
        Self {
            base_color: material.base_color,
            emissive: [r, g, b, 0.0],
        }
    }
}

/// One mesh as the renderer sees it for a single frame
#[derive(Debug, Clone)]
pub struct MeshDraw {
    pub vertices: Arc<[MeshVertex]>,
    pub indices: Arc<[u32]>,
    pub material: Material,
}

/// Everything the paint callback needs for one frame
#[derive(Debug, Clone)]
pub struct SceneFrame {
    pub generation: Option<u64>,
    pub uniforms: FrameUniforms,
    pub meshes: Vec<MeshDraw>,
    pub textures: Vec<Option<TextureImage>>,
}

impl SceneFrame {
    pub fn capture(camera: &Camera3D, model: Option<&SceneModel>) -> Self {
        let meshes = model
            .map(|model| {
                model
                    .meshes
                    .iter()
                    .map(|mesh| MeshDraw {
                        vertices: Arc::clone(&mesh.vertices),
                        indices: Arc::clone(&mesh.indices),
                        material: mesh.material,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            generation: model.map(SceneModel::generation),
            uniforms: FrameUniforms::new(camera.build_view_projection_matrix(), camera.position),
            meshes,
            textures: model.map(|model| model.textures.clone()).unwrap_or_default(),
        }
    }
}

/// Edge list for drawing a triangle list as lines
pub fn line_indices(indices: &[u32]) -> Vec<u32> {
    indices
        .chunks_exact(3)
        .flat_map(|tri| [tri[0], tri[1], tri[1], tri[2], tri[2], tri[0]])
        .collect()
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    line_buffer: wgpu::Buffer,
    line_count: u32,
}

/// Per-mesh state copied out of the frame's materials
#[derive(Debug, Clone, Copy, Default)]
struct DrawState {
    wireframe: bool,
    texture: Option<usize>,
}

pub struct SceneRenderer {
    config: GraphicsConfig,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    shadow_bind_group: wgpu::BindGroup,
    shadow_view: wgpu::TextureView,
    node_layout: wgpu::BindGroupLayout,
    node_buffer: wgpu::Buffer,
    node_bind_group: wgpu::BindGroup,
    node_stride: u64,
    node_capacity: usize,
    texture_layout: wgpu::BindGroupLayout,
    texture_sampler: wgpu::Sampler,
    white_texture: wgpu::BindGroup,
    textures: Vec<Option<wgpu::BindGroup>>,
    meshes: Vec<Option<GpuMesh>>,
    draw_states: Vec<DrawState>,
    generation: Option<u64>,
}

impl std::fmt::Debug for SceneRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRenderer")
            .field("config", &self.config)
            .field("meshes", &self.meshes.len())
            .field("textures", &self.textures.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl SceneRenderer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, config: GraphicsConfig) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        let frame_entry = wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Frame Layout"),
            entries: &[
                frame_entry,
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        // The shadow pass writes the map, so its layout must not bind it
        let shadow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Shadow Layout"),
            entries: &[frame_entry],
        });

        let node_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Node Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(mem::size_of::<NodeUniforms>() as u64),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Frame Uniforms"),
            contents: bytemuck::cast_slice(&[FrameUniforms::new(Mat4::IDENTITY, Vec3::ZERO)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shadow_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Shadow Map"),
            size: wgpu::Extent3d {
                width: lighting::SHADOW_MAP_SIZE,
                height: lighting::SHADOW_MAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let shadow_view = shadow_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Shadow Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Shadow Bind Group"),
            layout: &shadow_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let node_stride = (mem::size_of::<NodeUniforms>() as u64).div_ceil(alignment) * alignment;
        let node_capacity = 16;
        let (node_buffer, node_bind_group) =
            Self::create_node_storage(device, &node_layout, node_stride, node_capacity);

        // glTF samplers default to repeat wrapping
        let texture_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let white = TextureImage {
            width: 1,
            height: 1,
            rgba: Arc::from([255u8; 4].as_slice()),
        };
        let white_texture =
            Self::create_texture_bind_group(device, queue, &texture_layout, &texture_sampler, &white);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &node_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let create_pipeline = |label: &str, fragment: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                cache: None,
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[MeshVertex::desc()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment),
                    targets: &[Some(config.color_target_state())],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    // Lines come from an edge index list, so no POLYGON_MODE_LINE feature is needed
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: config.depth_stencil_state(),
                multisample: config.multisample_state(),
                multiview: None,
            })
        };

        let mesh_pipeline = create_pipeline(
            "Scene Mesh Pipeline",
            "fs_main",
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = create_pipeline(
            "Scene Wireframe Pipeline",
            "fs_line",
            wgpu::PrimitiveTopology::LineList,
        );

        let shadow_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Shadow Pipeline Layout"),
            bind_group_layouts: &[&shadow_layout],
            push_constant_ranges: &[],
        });
        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Shadow Pipeline"),
            layout: Some(&shadow_pipeline_layout),
            cache: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                buffers: &[MeshVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: SHADOW_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        log::info!(
            "Scene renderer initialized ({:?}, {}px shadow map)",
            config.texture_format,
            lighting::SHADOW_MAP_SIZE
        );

        Self {
            config,
            mesh_pipeline,
            line_pipeline,
            shadow_pipeline,
            frame_buffer,
            frame_bind_group,
            shadow_bind_group,
            shadow_view,
            node_layout,
            node_buffer,
            node_bind_group,
            node_stride,
            node_capacity,
            texture_layout,
            texture_sampler,
            white_texture,
            textures: Vec::new(),
            meshes: Vec::new(),
            draw_states: Vec::new(),
            generation: None,
        }
    }

    fn create_node_storage(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Node Uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Node Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(mem::size_of::<NodeUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        image: &TextureImage,
    ) -> wgpu::BindGroup {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("Scene Base Color Texture"),
                size: wgpu::Extent3d {
                    width: image.width,
                    height: image.height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                // Sampled values are used as-is, like material base colors
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &image.rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn upload_model(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &SceneFrame) {
        self.meshes = frame
            .meshes
            .iter()
            .map(|mesh| {
                if mesh.indices.is_empty() || mesh.vertices.is_empty() {
                    return None;
                }
                let lines = line_indices(&mesh.indices);
                Some(GpuMesh {
                    vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Scene Vertex Buffer"),
                        contents: bytemuck::cast_slice(&mesh.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Scene Index Buffer"),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    index_count: mesh.indices.len() as u32,
                    line_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Scene Line Buffer"),
                        contents: bytemuck::cast_slice(&lines),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                    line_count: lines.len() as u32,
                })
            })
            .collect();
        self.textures = frame
            .textures
            .iter()
            .map(|image| {
                image.as_ref().map(|image| {
                    Self::create_texture_bind_group(
                        device,
                        queue,
                        &self.texture_layout,
                        &self.texture_sampler,
                        image,
                    )
                })
            })
            .collect();
        self.generation = frame.generation;
        log::debug!(
            "Uploaded {} meshes and {} textures for model generation {:?}",
            self.meshes.len(),
            self.textures.iter().flatten().count(),
            self.generation
        );
    }

    /// Uploads the model when it changed and rewrites all uniforms
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &SceneFrame) {
        if frame.generation != self.generation {
            self.upload_model(device, queue, frame);
        }

        if frame.meshes.len() > self.node_capacity {
            self.node_capacity = frame.meshes.len().next_power_of_two();
            let (buffer, bind_group) = Self::create_node_storage(
                device,
                &self.node_layout,
                self.node_stride,
                self.node_capacity,
            );
            self.node_buffer = buffer;
            self.node_bind_group = bind_group;
        }

        queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame.uniforms]));

        if !frame.meshes.is_empty() {
            let stride = self.node_stride as usize;
            let mut bytes = vec![0u8; stride * frame.meshes.len()];
            for (slot, mesh) in bytes.chunks_exact_mut(stride).zip(&frame.meshes) {
                let uniforms = NodeUniforms::from(&mesh.material);
                let data = bytemuck::bytes_of(&uniforms);
                slot[..data.len()].copy_from_slice(data);
            }
            queue.write_buffer(&self.node_buffer, 0, &bytes);
        }

        self.draw_states = frame
            .meshes
            .iter()
            .map(|m| DrawState {
                wireframe: m.material.wireframe,
                texture: m.material.base_color_texture,
            })
            .collect();
    }

    /// Records the key light's depth pass. The map is cleared even when no
    /// model is loaded so the viewport pass never samples stale depth.
    pub fn render_shadows(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Shadow Pass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.shadow_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.shadow_pipeline);
        pass.set_bind_group(0, &self.shadow_bind_group, &[]);
        for mesh in self.meshes.iter().flatten() {
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    pub fn paint(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (index, mesh) in self.meshes.iter().enumerate() {
            let Some(mesh) = mesh else { continue };
            let state = self.draw_states.get(index).copied().unwrap_or_default();
            let texture = state
                .texture
                .and_then(|slot| self.textures.get(slot))
                .and_then(Option::as_ref)
                .unwrap_or(&self.white_texture);

            let offset = (index as u64 * self.node_stride) as u32;
            render_pass.set_bind_group(1, &self.node_bind_group, &[offset]);
            render_pass.set_bind_group(2, texture, &[]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));

            if state.wireframe {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_index_buffer(mesh.line_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.line_count, 0, 0..1);
            } else {
                render_pass.set_pipeline(&self.mesh_pipeline);
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_indices_cover_edges() {
        assert_eq!(line_indices(&[0, 1, 2]), vec![0, 1, 1, 2, 2, 0]);
        assert_eq!(line_indices(&[0, 1, 2, 3]).len(), 6);
    }

    #[test]
    fn test_node_uniforms_carry_highlight() {
        let mut material = Material::default();
        material.emissive = crate::scene::HIGHLIGHT_EMISSIVE;
        let uniforms = NodeUniforms::from(&material);
        assert_eq!(uniforms.emissive[..3], crate::scene::HIGHLIGHT_EMISSIVE);
        assert_eq!(uniforms.base_color, [1.0; 4]);
    }

    #[test]
    fn test_frame_lights_point_toward_sources() {
        let uniforms = FrameUniforms::new(Mat4::IDENTITY, Vec3::ZERO);
        assert_eq!(uniforms.ambient, [0.6, 0.6, 0.6, 1.0]);
        assert!(uniforms.key_light[1] > 0.0);
        assert_eq!(uniforms.key_light[3], 0.8);
        assert!(uniforms.fill_light[0] < 0.0);
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        let layout = MeshVertex::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[2].offset, 24);
        assert_eq!(layout.attributes[2].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn test_key_light_frustum_covers_origin() {
        let light = key_light_view_projection();
        let origin = light.project_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-4 && origin.y.abs() < 1e-4);
        // Depth of the origin is its distance from the light over the frustum depth
        let distance = Vec3::from(lighting::KEY_LIGHT_POSITION).length();
        let expected = (distance - lighting::SHADOW_NEAR)
            / (lighting::SHADOW_FAR - lighting::SHADOW_NEAR);
        assert!((origin.z - expected).abs() < 1e-4);

        let forward = -Vec3::from(lighting::KEY_LIGHT_POSITION).normalize();
        let right = forward.cross(Vec3::Y).normalize();
        let edge = light.project_point3(right * lighting::SHADOW_EXTENT);
        assert!((edge.x - 1.0).abs() < 1e-4);
        let outside = light.project_point3(right * (lighting::SHADOW_EXTENT + 10.0));
        assert!(outside.x > 1.0);
    }

    #[test]
    fn test_frame_carries_light_matrix() {
        let uniforms = FrameUniforms::new(Mat4::IDENTITY, Vec3::ZERO);
        assert_eq!(
            uniforms.light_view_proj,
            key_light_view_projection().to_cols_array_2d()
        );
        assert_eq!(mem::size_of::<FrameUniforms>(), 192);
    }

    #[test]
    fn test_capture_without_model() {
        let frame = SceneFrame::capture(&Camera3D::new(), None);
        assert!(frame.generation.is_none());
        assert!(frame.meshes.is_empty());
        assert!(frame.textures.is_empty());
    }
}
