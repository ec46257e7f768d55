//! Simulation orchestration: the body collection, the fixed time step, and
//! the per-frame update/render pair driven by the window loop.

use anyhow::{bail, Result};
use glam::{Mat4, Vec3};

use crate::body::Body;
use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::gpu::GpuContext;
use crate::mesh::{GpuMesh, SphereMesh};
use crate::shader::{SpherePipeline, UniformBlock};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.01,
    g: 0.01,
    b: 0.02,
    a: 1.0,
};

/// Initialization progresses strictly `Uninitialized -> BodiesReady ->
/// ShadersReady`; out-of-order or repeated calls are errors rather than
/// silent undefined behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimState {
    Uninitialized,
    BodiesReady,
    ShadersReady,
}

impl SimState {
    fn advance_to_bodies_ready(self) -> Result<Self> {
        match self {
            SimState::Uninitialized => Ok(SimState::BodiesReady),
            SimState::BodiesReady | SimState::ShadersReady => {
                bail!("initialize_bodies() called twice")
            }
        }
    }

    fn advance_to_shaders_ready(self) -> Result<Self> {
        match self {
            SimState::Uninitialized => {
                bail!("initialize_shaders() called before initialize_bodies()")
            }
            SimState::BodiesReady => Ok(SimState::ShadersReady),
            SimState::ShadersReady => bail!("initialize_shaders() called twice"),
        }
    }

    fn ensure_render_ready(self) -> Result<()> {
        match self {
            SimState::ShadersReady => Ok(()),
            SimState::Uninitialized | SimState::BodiesReady => {
                bail!("render() called before initialize_shaders()")
            }
        }
    }
}

/// GPU-side scene resources, created by `initialize_shaders` and released
/// when the simulation is dropped.
struct SceneGraphics {
    pipeline: SpherePipeline,
    mesh: GpuMesh,
    uniforms: UniformBlock,
}

pub struct Simulation {
    config: ViewerConfig,
    bodies: Vec<Body>,
    time_step: f64,
    camera: Camera,
    state: SimState,
    graphics: Option<SceneGraphics>,
}

impl Simulation {
    pub fn new(config: ViewerConfig) -> Self {
        let camera = Camera::new(config.aspect_ratio());
        let time_step = config.time_step;
        Self {
            config,
            bodies: Vec::new(),
            time_step,
            camera,
            state: SimState::Uninitialized,
            graphics: None,
        }
    }

    /// Populate the body sequence from the configured scene. Must be called
    /// exactly once, before `initialize_shaders`. An empty scene is a
    /// configuration error: the viewer has nothing to draw.
    pub fn initialize_bodies(&mut self) -> Result<()> {
        let next = self.state.advance_to_bodies_ready()?;
        if self.config.bodies.is_empty() {
            bail!("scene has no bodies");
        }
        self.bodies = self
            .config
            .bodies
            .iter()
            .map(|spec| Body::new(spec.position, spec.velocity, spec.mass, spec.radius))
            .collect();
        self.state = next;
        log::info!("initialized {} bodies", self.bodies.len());
        Ok(())
    }

    /// Build the sphere mesh, compile and link the shader pipeline, and
    /// allocate one uniform slot per body. Must follow `initialize_bodies`
    /// and may only run once.
    pub fn initialize_shaders(
        &mut self,
        gpu: &GpuContext,
        surface_format: wgpu::TextureFormat,
    ) -> Result<()> {
        let next = self.state.advance_to_shaders_ready()?;

        let mesh = SphereMesh::build(self.config.latitude_bands, self.config.longitude_bands);
        log::info!(
            "built sphere proxy with {} vertices ({}x{} bands)",
            mesh.vertex_count(),
            self.config.latitude_bands,
            self.config.longitude_bands
        );

        let pipeline = SpherePipeline::new(
            &gpu.device,
            surface_format,
            &self.config.shader_dir,
            self.bodies.len(),
        )?;

        self.graphics = Some(SceneGraphics {
            pipeline,
            mesh: mesh.upload(&gpu.device),
            uniforms: UniformBlock::new(self.bodies.len()),
        });
        self.state = next;
        Ok(())
    }

    /// Integrate every body by the fixed time step. Infallible; called once
    /// per frame by the external loop.
    pub fn update(&mut self) {
        for body in &mut self.bodies {
            body.integrate(self.time_step);
        }
    }

    /// Draw every body as a scaled sphere into `target`. Clears color and
    /// depth, then per body writes the model/view/projection matrices into
    /// that body's uniform slot and issues one strip draw. Depth testing is
    /// active exactly for the duration of the pass.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
    ) -> Result<()> {
        self.state.ensure_render_ready()?;
        let Some(graphics) = &mut self.graphics else {
            bail!("render() called before initialize_shaders()");
        };

        let view = self.camera.view();
        let projection = self.camera.projection();
        let handles = graphics.pipeline.handles();

        for (slot, body) in self.bodies.iter().enumerate() {
            let model = model_matrix(body, self.config.world_scale);
            graphics.uniforms.set_matrix(slot, handles.model, &model);
            graphics.uniforms.set_matrix(slot, handles.view, &view);
            graphics.uniforms.set_matrix(slot, handles.projection, &projection);
        }
        graphics.pipeline.write_uniforms(&gpu.queue, &graphics.uniforms);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sphere Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            graphics.pipeline.activate(&mut render_pass);
            for slot in 0..self.bodies.len() {
                graphics.pipeline.bind_slot(&mut render_pass, slot);
                graphics.mesh.draw(&mut render_pass);
            }
        }
        gpu.queue.submit(Some(encoder.finish()));

        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.camera.set_aspect_ratio(aspect_ratio);
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }
}

/// Per-body model transform: translate by the world-scaled position, then
/// scale by the world-scaled radius.
pub fn model_matrix(body: &Body, world_scale: f64) -> Mat4 {
    let position = body.position();
    let translation = Vec3::new(
        (position.x / world_scale) as f32,
        (position.y / world_scale) as f32,
        (position.z / world_scale) as f32,
    );
    let scale = (body.radius() / world_scale) as f32;
    Mat4::from_translation(translation) * Mat4::from_scale(Vec3::splat(scale))
}
