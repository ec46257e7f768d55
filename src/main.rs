//! Entry point: window and event-loop glue around the simulation.
//!
//! The loop calls `update()` then `render()` once per frame and presents the
//! surface; everything else (scene state, mesh, pipeline) lives in the
//! library crate. Setup failures abort with a single diagnostic.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use nbody_viewer::{
    config::ViewerConfig,
    gpu::{GpuContext, SurfaceState},
    sim::Simulation,
};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

#[derive(Parser, Debug)]
#[command(name = "nbody_viewer")]
#[command(about = "Straight-line two-body visualization with sphere proxies")]
struct Args {
    /// Directory holding sphere_vs.wgsl and sphere_fs.wgsl
    #[arg(long)]
    shader_dir: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = ViewerConfig::default();
    if let Some(shader_dir) = args.shader_dir {
        config.shader_dir = shader_dir;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("N-Body Viewer")
        .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
        .build(&event_loop)?;

    let gpu = pollster::block_on(GpuContext::new())?;
    let mut surface = SurfaceState::new(&gpu, &window)?;

    let mut sim = Simulation::new(config);
    sim.initialize_bodies()?;
    sim.initialize_shaders(&gpu, surface.format())?;
    sim.set_aspect_ratio(surface.aspect_ratio());

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::AboutToWait => window.request_redraw(),
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => {
                    surface.resize(&gpu, physical_size);
                    sim.set_aspect_ratio(surface.aspect_ratio());
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    if let winit::keyboard::PhysicalKey::Code(code) = physical_key {
                        if matches!(
                            code,
                            winit::keyboard::KeyCode::KeyQ | winit::keyboard::KeyCode::Escape
                        ) {
                            elwt.exit();
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    sim.update();
                    render_frame(&mut sim, &gpu, &mut surface, &window, elwt);
                }
                _ => {}
            },
            _ => {}
        }
    })?;

    Ok(())
}

fn render_frame(
    sim: &mut Simulation,
    gpu: &GpuContext,
    surface: &mut SurfaceState,
    window: &winit::window::Window,
    elwt: &winit::event_loop::EventLoopWindowTarget<()>,
) {
    let frame = match surface.acquire() {
        Ok(frame) => frame,
        Err(wgpu::SurfaceError::Lost) => {
            surface.resize(gpu, window.inner_size());
            return;
        }
        Err(wgpu::SurfaceError::OutOfMemory) => {
            log::error!("surface out of memory, exiting");
            elwt.exit();
            return;
        }
        Err(e) => {
            log::warn!("dropped frame: {e:?}");
            return;
        }
    };

    let target = frame
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    if let Err(e) = sim.render(gpu, &target, surface.depth_view()) {
        log::error!("render failed: {e}");
        elwt.exit();
        return;
    }
    frame.present();
}
