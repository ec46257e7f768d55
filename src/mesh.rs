//! Procedural unit-sphere proxy mesh.
//!
//! One sphere is tessellated once at startup and shared by every body; the
//! per-body size comes from the model matrix, never from re-tessellation.

use wgpu::util::DeviceExt;

/// CPU-side unit-sphere vertex set, immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    vertices: Vec<[f32; 3]>,
}

impl SphereMesh {
    /// Latitude/longitude tessellation of the unit sphere.
    ///
    /// Sweeps the polar angle `theta = lat * pi / latitude_bands` for
    /// `lat` in `0..=latitude_bands` and, per ring, the azimuth
    /// `phi = lon * 2pi / longitude_bands`, emitting
    /// `(cos(phi) sin(theta), cos(theta), sin(phi) sin(theta))` in row-major
    /// order: `(latitude_bands + 1) * (longitude_bands + 1)` vertices total.
    ///
    /// The vertex run is drawn directly as a triangle strip with no index
    /// buffer. That is only an approximate sphere topology; the choice over
    /// a proper indexed strip is deliberate (see DESIGN.md).
    pub fn build(latitude_bands: u32, longitude_bands: u32) -> Self {
        let mut vertices =
            Vec::with_capacity(((latitude_bands + 1) * (longitude_bands + 1)) as usize);

        for lat in 0..=latitude_bands {
            let theta = lat as f32 * std::f32::consts::PI / latitude_bands as f32;
            let sin_theta = theta.sin();
            let cos_theta = theta.cos();

            for lon in 0..=longitude_bands {
                let phi = lon as f32 * 2.0 * std::f32::consts::PI / longitude_bands as f32;
                vertices.push([phi.cos() * sin_theta, cos_theta, phi.sin() * sin_theta]);
            }
        }

        Self { vertices }
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// One-time transfer to a GPU-resident vertex buffer. There is no
    /// re-upload path; the returned mesh is immutable.
    pub fn upload(&self, device: &wgpu::Device) -> GpuMesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        GpuMesh {
            vertex_buffer,
            vertex_count: self.vertex_count(),
        }
    }

    /// Position-only vertex layout, 3 floats at shader location 0.
    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: 3 * 4,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// GPU-resident sphere mesh. Dropping it releases the vertex buffer.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl GpuMesh {
    /// Issue one triangle-strip draw over the full vertex run.
    pub fn draw<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
