//! Shader pipeline setup: stage source loading, compilation, linking into a
//! render pipeline, and uniform handle resolution.
//!
//! Setup failures are fatal. A missing source file or a compile/link
//! diagnostic aborts startup with the driver's message instead of limping
//! on with an unusable program.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Mat4;

use crate::mesh::SphereMesh;

pub const VERTEX_SHADER_FILE: &str = "sphere_vs.wgsl";
pub const FRAGMENT_SHADER_FILE: &str = "sphere_fs.wgsl";

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Byte offsets of the three matrix uniforms within one uniform slot.
const MODEL_OFFSET: u64 = 0;
const VIEW_OFFSET: u64 = 64;
const PROJECTION_OFFSET: u64 = 128;

/// Bytes actually occupied by the three matrices.
pub const UNIFORM_BLOCK_SIZE: u64 = 192;
/// Per-body slot stride, padded to the uniform dynamic-offset alignment.
pub const UNIFORM_SLOT_STRIDE: u64 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn label(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Read one stage's WGSL source in full. Missing, unreadable, or empty
/// sources are startup errors.
pub fn load_source(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read shader source {}", path.display()))?;
    if source.trim().is_empty() {
        bail!("shader source {} is empty", path.display());
    }
    Ok(source)
}

/// Compile one stage inside a validation error scope so a driver diagnostic
/// becomes an error instead of an uncaptured panic.
pub fn compile(
    device: &wgpu::Device,
    source: &str,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(stage.label()),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        bail!("{} shader failed to compile: {error}", stage.label());
    }
    Ok(module)
}

/// Resolved reference to one named matrix uniform: a byte offset within a
/// uniform slot, or a not-found sentinel. Writes through a sentinel are
/// no-ops, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformHandle {
    offset: Option<u64>,
}

impl UniformHandle {
    pub const NOT_FOUND: Self = Self { offset: None };

    pub fn is_resolved(&self) -> bool {
        self.offset.is_some()
    }
}

/// The three matrix uniforms the sphere shader is expected to declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformHandles {
    pub model: UniformHandle,
    pub view: UniformHandle,
    pub projection: UniformHandle,
}

/// Look up the `model`, `view`, and `projection` matrix uniforms in the two
/// stage sources. A name that neither stage declares resolves to the
/// not-found sentinel; the lookup itself never fails.
pub fn resolve_uniforms(vertex_source: &str, fragment_source: &str) -> UniformHandles {
    let resolve = |name: &str, offset: u64| {
        if declares_matrix(vertex_source, name) || declares_matrix(fragment_source, name) {
            UniformHandle {
                offset: Some(offset),
            }
        } else {
            log::warn!("uniform `{name}` not declared in shader sources; writes will be dropped");
            UniformHandle::NOT_FOUND
        }
    };

    UniformHandles {
        model: resolve("model", MODEL_OFFSET),
        view: resolve("view", VIEW_OFFSET),
        projection: resolve("projection", PROJECTION_OFFSET),
    }
}

/// True if the source declares a `mat4x4` struct member with this name.
fn declares_matrix(source: &str, name: &str) -> bool {
    source.lines().any(|line| {
        let trimmed = line.trim();
        trimmed.strip_prefix(name).is_some_and(|rest| {
            let rest = rest.trim_start();
            rest.starts_with(':') && rest.contains("mat4x4")
        })
    })
}

/// CPU staging area for per-body uniform slots, flushed to the GPU buffer
/// once per frame.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(slots: usize) -> Self {
        Self {
            bytes: vec![0; slots * UNIFORM_SLOT_STRIDE as usize],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.bytes.len() / UNIFORM_SLOT_STRIDE as usize
    }

    /// Write one matrix through a resolved handle into the given slot.
    /// A not-found handle makes this a no-op.
    pub fn set_matrix(&mut self, slot: usize, handle: UniformHandle, matrix: &Mat4) {
        let Some(offset) = handle.offset else {
            return;
        };
        let start = slot * UNIFORM_SLOT_STRIDE as usize + offset as usize;
        let columns = matrix.to_cols_array();
        self.bytes[start..start + 64].copy_from_slice(bytemuck::cast_slice(&columns));
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Linked sphere pipeline: the render pipeline, its per-body uniform buffer,
/// and the resolved uniform handles. Dropping it releases the GPU objects.
pub struct SpherePipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    handles: UniformHandles,
}

impl SpherePipeline {
    /// Load, compile, and link both stages from `shader_dir`, resolve the
    /// uniform handles, and allocate `max_slots` uniform slots. The
    /// intermediate stage modules are dropped once the pipeline is linked.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        shader_dir: &Path,
        max_slots: usize,
    ) -> Result<Self> {
        let vertex_source = load_source(&shader_dir.join(VERTEX_SHADER_FILE))?;
        let fragment_source = load_source(&shader_dir.join(FRAGMENT_SHADER_FILE))?;

        let vertex_module = compile(device, &vertex_source, ShaderStage::Vertex)?;
        let fragment_module = compile(device, &fragment_source, ShaderStage::Fragment)?;

        let handles = resolve_uniforms(&vertex_source, &fragment_source);

        // The bind group always declares a full 192-byte binding, so the
        // buffer keeps at least one slot even if no draws ever use it.
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sphere Uniform Buffer"),
            size: max_slots.max(1) as u64 * UNIFORM_SLOT_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Sphere Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(UNIFORM_BLOCK_SIZE),
                    },
                    count: None,
                }],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sphere Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(UNIFORM_BLOCK_SIZE),
                }),
            }],
        });

        let pipeline = Self::link(
            device,
            &vertex_module,
            &fragment_module,
            &bind_group_layout,
            surface_format,
        )?;

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
            handles,
        })
    }

    /// Link the two compiled stages into one render pipeline, again inside
    /// an error scope so a link diagnostic surfaces as an error.
    fn link(
        device: &wgpu::Device,
        vertex_module: &wgpu::ShaderModule,
        fragment_module: &wgpu::ShaderModule,
        bind_group_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> Result<wgpu::RenderPipeline> {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: vertex_module,
                entry_point: "vs_main",
                buffers: &[SphereMesh::vertex_buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: fragment_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            bail!("shader program failed to link: {error}");
        }
        Ok(pipeline)
    }

    pub fn handles(&self) -> UniformHandles {
        self.handles
    }

    /// Flush the staged uniform slots to the GPU buffer.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, block: &UniformBlock) {
        queue.write_buffer(&self.uniform_buffer, 0, block.as_bytes());
    }

    /// Activate the program for the pass.
    pub fn activate<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_pipeline(&self.pipeline);
    }

    /// Bind one body's uniform slot via its dynamic offset.
    pub fn bind_slot<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>, slot: usize) {
        render_pass.set_bind_group(0, &self.bind_group, &[slot as u32 * UNIFORM_SLOT_STRIDE as u32]);
    }
}
