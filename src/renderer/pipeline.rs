//! WebGPU render pipeline setup

use std::collections::HashMap;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::Result;
use crate::objects::{Mesh, Vertex};
use crate::scene::{Frame, MeshKind, ProgramKind, RenderResources, TextureId, Uniforms};
use crate::texture::TextureImage;

/// Draw calls per frame with uniform slots reserved
const MAX_DRAWS: usize = 16;

/// Remaps GL clip depth (-w..w) to the wgpu range (0..w)
///
/// Applied only when uploading; the scene and picking keep GL conventions.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

// Must match DrawUniform in color.wgsl / texture.wgsl
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DrawUniform {
    mvp: [[f32; 4]; 4], // offset 0
    color: [f32; 4],    // offset 64
}

impl From<&Uniforms> for DrawUniform {
    fn from(uniforms: &Uniforms) -> Self {
        let mvp = (OPENGL_TO_WGPU_MATRIX * *uniforms.mvp()).to_cols_array_2d();
        let color = match uniforms {
            Uniforms::Color { color, .. } => color.extend(1.0).to_array(),
            Uniforms::Texture { .. } => [1.0; 4],
        };
        Self { mvp, color }
    }
}

struct MeshBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

/// Find any adapter that can render offscreen
pub async fn request_headless_adapter() -> Result<wgpu::Adapter> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await?;
    log::info!("Using adapter: {:?}", adapter.get_info());
    Ok(adapter)
}

/// Texture to render into without a window
pub struct OffscreenTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub size: (u32, u32),
}

impl OffscreenTarget {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen_target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            size: (width, height),
        }
    }
}

/// Main render state
pub struct GpuRenderer {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub format: wgpu::TextureFormat,
    color_pipeline: wgpu::RenderPipeline,
    texture_pipeline: wgpu::RenderPipeline,

    // One slot per draw, addressed with a dynamic offset
    uniform_buffer: wgpu::Buffer,
    uniform_stride: u64,
    uniform_bind_group: wgpu::BindGroup,

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: Vec<wgpu::BindGroup>,
    meshes: HashMap<MeshKind, MeshBuffer>,
}

impl GpuRenderer {
    pub async fn new(adapter: &wgpu::Adapter, format: wgpu::TextureFormat) -> Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("air-hockey-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let uniform_size = std::mem::size_of::<DrawUniform>() as u64;
        let uniform_stride = wgpu::util::align_to(
            uniform_size,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: uniform_stride * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(uniform_size),
                },
                count: None,
            }],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: NonZeroU64::new(uniform_size),
                }),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("surface_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("surface_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let color_pipeline = create_pipeline(
            &device,
            "color_pipeline",
            wgpu::ShaderSource::Wgsl(include_str!("color.wgsl").into()),
            &[&uniform_layout],
            format,
        );
        let texture_pipeline = create_pipeline(
            &device,
            "texture_pipeline",
            wgpu::ShaderSource::Wgsl(include_str!("texture.wgsl").into()),
            &[&uniform_layout, &texture_layout],
            format,
        );
        log::info!("Pipelines created for {:?}", format);

        Ok(Self {
            device,
            queue,
            format,
            color_pipeline,
            texture_pipeline,
            uniform_buffer,
            uniform_stride,
            uniform_bind_group,
            texture_layout,
            sampler,
            textures: Vec::new(),
            meshes: HashMap::new(),
        })
    }

    /// Replay a recorded frame into `target`
    pub fn render(&mut self, frame: &Frame, target: &wgpu::TextureView) {
        let draws = frame.draws();
        if draws.len() > MAX_DRAWS {
            log::warn!("Frame has {} draws, keeping the first {}", draws.len(), MAX_DRAWS);
        }
        let draws = &draws[..draws.len().min(MAX_DRAWS)];

        // Upload every draw's uniforms in one write
        let stride = self.uniform_stride as usize;
        let mut uniform_bytes = vec![0u8; stride * draws.len()];
        for (i, draw) in draws.iter().enumerate() {
            let uniform = DrawUniform::from(&draw.uniforms);
            let bytes = bytemuck::bytes_of(&uniform);
            uniform_bytes[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !uniform_bytes.is_empty() {
            self.queue
                .write_buffer(&self.uniform_buffer, 0, &uniform_bytes);
        }

        let load = match frame.clear_color() {
            Some([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for (i, draw) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.mesh) else {
                    log::warn!("Skipping draw of {:?}: mesh not uploaded", draw.mesh);
                    continue;
                };

                match (draw.program, &draw.uniforms) {
                    (ProgramKind::Color, _) => {
                        render_pass.set_pipeline(&self.color_pipeline);
                    }
                    (ProgramKind::Texture, Uniforms::Texture { texture, .. }) => {
                        let Some(bind_group) = self.textures.get(texture.0 as usize) else {
                            log::warn!("Skipping draw: unknown texture {:?}", texture);
                            continue;
                        };
                        render_pass.set_pipeline(&self.texture_pipeline);
                        render_pass.set_bind_group(1, bind_group, &[]);
                    }
                    (ProgramKind::Texture, Uniforms::Color { .. }) => {
                        log::warn!("Skipping draw: texture program without a texture");
                        continue;
                    }
                }

                let offset = (i as u64 * self.uniform_stride) as u32;
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                render_pass.draw(0..draw.vertex_count.min(mesh.vertex_count), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl RenderResources for GpuRenderer {
    fn load_texture(&mut self, image: &TextureImage) -> Result<TextureId> {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("surface_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("surface_texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.textures.push(bind_group);
        let id = TextureId(self.textures.len() as u32 - 1);
        log::info!("Uploaded texture {:?} ({}x{})", id, image.width, image.height);
        Ok(id)
    }

    fn upload_mesh(&mut self, kind: MeshKind, mesh: &Mesh) -> Result<()> {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(mesh.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.meshes.insert(
            kind,
            MeshBuffer {
                buffer,
                vertex_count: mesh.vertex_count(),
            },
        );
        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    source: wgpu::ShaderSource<'_>,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source,
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::objects::{Drawable, Mallet, Puck, Table};
    use crate::scene::{AirHockeyRenderer, CpuResources};
    use crate::settings::Settings;
    use crate::texture::TextureSource;
    use glam::{Vec3, Vec4};

    fn uploaded_mvp(uniforms: &Uniforms) -> Mat4 {
        Mat4::from_cols_array_2d(&DrawUniform::from(uniforms).mvp)
    }

    #[test]
    fn test_depth_remap_keeps_xy_and_w() {
        let clip = Vec4::new(0.3, -0.4, -2.0, 2.0);
        let remapped = OPENGL_TO_WGPU_MATRIX * clip;
        assert_eq!(remapped, Vec4::new(0.3, -0.4, 0.0, 2.0));
        let far = OPENGL_TO_WGPU_MATRIX * Vec4::new(0.0, 0.0, 2.0, 2.0);
        assert_eq!(far.z, 2.0);
    }

    #[test]
    fn test_uploaded_scene_depth_within_wgpu_range() {
        let settings = Settings {
            texture: TextureSource::Procedural { size: 8 },
            ..Settings::default()
        };
        let mut renderer = AirHockeyRenderer::new(&settings);
        renderer
            .on_surface_created(&mut CpuResources::default())
            .unwrap();
        renderer.on_surface_changed(800, 480).unwrap();
        let frame = renderer.on_draw_frame().unwrap();

        let table = Table::new();
        let mallet = Mallet::new(MALLET_RADIUS, MALLET_HEIGHT, MESH_POINTS);
        let puck = Puck::new(PUCK_RADIUS, PUCK_HEIGHT, MESH_POINTS);

        assert_eq!(frame.draws().len(), 4);
        for draw in frame.draws() {
            let mesh = match draw.mesh {
                MeshKind::Table => table.mesh(),
                MeshKind::Mallet => mallet.mesh(),
                MeshKind::Puck => puck.mesh(),
            };
            let mvp = uploaded_mvp(&draw.uniforms);
            for v in mesh.vertices() {
                let clip = mvp * Vec3::from(v.position).extend(1.0);
                assert!(
                    clip.z >= 0.0 && clip.z <= clip.w,
                    "{:?} vertex {:?} has clip z {} outside [0, {}]",
                    draw.mesh,
                    v.position,
                    clip.z,
                    clip.w
                );
            }
        }
    }

    #[test]
    fn test_draw_uniform_layout() {
        assert_eq!(std::mem::size_of::<DrawUniform>(), 80);
        assert_eq!(wgpu::util::align_to(80u64, 256), 256);
    }

    #[test]
    fn test_draw_uniform_from_color() {
        let mvp = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let uniform = DrawUniform::from(&Uniforms::Color {
            mvp,
            color: Vec3::new(0.8, 0.8, 1.0),
        });
        assert_eq!(uniform.color, [0.8, 0.8, 1.0, 1.0]);
        // Column-major: translation lives in the last column, z remapped to 0.5z + 0.5w
        assert_eq!(uniform.mvp[3], [1.0, 2.0, 2.0, 1.0]);
    }

    #[test]
    fn test_draw_uniform_from_texture_is_white() {
        let uniform = DrawUniform::from(&Uniforms::Texture {
            mvp: Mat4::IDENTITY,
            texture: TextureId(0),
        });
        assert_eq!(uniform.color, [1.0; 4]);
    }
}
