use anyhow::{Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::fatal::{Assertion, GraphicsError, Status};
use crate::paint::Color;
use crate::tiled::{TiledParams, TiledTexture};

use super::camera::CameraUniform;

/// Texture filtering used when sampling the tiled texture.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

/// Sampler state for the quad. Addressing always clamps to the edge texel.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SamplerState {
    pub filter: Filter,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SamplerUniform {
    linear: u32,
    _pad: [u32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position (client px)
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(crate) const QUAD_VERTEX_COUNT: u32 = 6;

/// Two triangles covering the middle 80% of the client area, textured with the
/// first 128x128 tile of a 256x256 texture (inset by one texel).
pub(crate) fn quad_vertices(width: f32, height: f32) -> [QuadVertex; 6] {
    let x = width * 0.1;
    let y = height * 0.1;
    let w = width * 0.8;
    let h = height * 0.8;

    let t0 = 1.0 / 256.0;
    let t1 = 127.0 / 256.0;

    let v = |px: f32, py: f32, u: f32, vv: f32| QuadVertex {
        position: [px, py, 0.0],
        uv: [u, vv],
    };
    [
        v(x, y, t0, t0),
        v(x + w, y, t1, t0),
        v(x, y + h, t0, t1),
        v(x, y + h, t0, t1),
        v(x + w, y, t1, t0),
        v(x + w, y + h, t1, t1),
    ]
}

/// Fixed pipeline drawing one quad textured with a [`TiledTexture`].
///
/// Geometry is built once from the client size at creation. The camera buffer
/// is rewritten on every resize so the projection keeps matching the client
/// area.
pub struct QuadRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    camera_ubo: wgpu::Buffer,
}

impl QuadRenderer {
    /// Compiles the pipeline and binds `texture`, which must already be backed
    /// by a tile pool.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        texture: &TiledTexture,
        sampler: SamplerState,
        client_size: (f32, f32),
    ) -> Result<Self> {
        let pool_buffer = texture
            .pool_buffer()
            .ok_or_else(|| Assertion("tiled texture is not bound to a tile pool".into()))?;

        let layout_entries = [
            uniform_entry::<CameraUniform>(0, wgpu::ShaderStages::VERTEX)?,
            uniform_entry::<TiledParams>(1, wgpu::ShaderStages::FRAGMENT)?,
            storage_entry(2),
            storage_entry(3),
            uniform_entry::<SamplerUniform>(4, wgpu::ShaderStages::FRAGMENT)?,
        ];

        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tilecheck quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/tiled_quad.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tilecheck quad bgl"),
            entries: &layout_entries,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tilecheck quad pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tilecheck quad pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
        });

        let (width, height) = client_size;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tilecheck quad vbo"),
            contents: bytemuck::cast_slice(&quad_vertices(width, height)),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let camera_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tilecheck camera ubo"),
            contents: bytemuck::bytes_of(&CameraUniform::for_client_area(width, height)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let sampler_ubo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tilecheck sampler ubo"),
            contents: bytemuck::bytes_of(&SamplerUniform {
                linear: u32::from(sampler.filter == Filter::Linear),
                _pad: [0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tilecheck quad bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: texture.params_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: texture.page_table_buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: pool_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: sampler_ubo.as_entire_binding(),
                },
            ],
        });

        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(GraphicsError {
                what: "quad pipeline",
                message: err.to_string(),
                status: Status::E_INVALIDARG,
            })
            .context("failed to create the quad pipeline");
        }

        log::info!("quad pipeline ready ({target_format:?}, {:?} filtering)", sampler.filter);

        Ok(Self {
            pipeline,
            bind_group,
            vertex_buffer,
            camera_ubo,
        })
    }

    /// Replaces the camera transform, e.g. after the client area changed.
    pub(crate) fn update_camera(&self, queue: &wgpu::Queue, camera: &CameraUniform) {
        queue.write_buffer(&self.camera_ubo, 0, bytemuck::bytes_of(camera));
    }

    /// Clears `view` to `clear` and draws the quad over the full `extent`.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        extent: (u32, u32),
        clear: Color,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tilecheck quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.into()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_viewport(0.0, 0.0, extent.0 as f32, extent.1 as f32, 0.0, 1.0);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
    }
}

fn uniform_entry<T>(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> Result<wgpu::BindGroupLayoutEntry> {
    let size = std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
        .context("uniform type has zero size")?;
    Ok(wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(size),
        },
        count: None,
    })
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_middle_of_client_area() {
        let v = quad_vertices(600.0, 600.0);
        assert_eq!(v.len() as u32, QUAD_VERTEX_COUNT);
        assert_eq!(v[0].position, [60.0, 60.0, 0.0]);
        assert_eq!(v[5].position, [540.0, 540.0, 0.0]);
    }

    #[test]
    fn quad_samples_only_first_tile() {
        for vertex in quad_vertices(600.0, 600.0) {
            for t in vertex.uv {
                assert!(t > 0.0 && t < 0.5, "uv {t} leaves tile (0, 0)");
            }
        }
    }
}
