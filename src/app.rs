use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::{Camera, CameraController, ViewerCameraController};
use crate::config::ViewerConfig;
use crate::core::{Button, FrameClock, GpuContext, InputState, WinitInput};
use crate::gui::{viewer_panel, Gui};
use crate::loaders::{load_gltf_file, GltfScene};
use crate::renderer::{render_to_image, SceneRenderer, ShaderSources};
use crate::scene::SceneFraming;

/// Loads the scene and either writes one image (`--output`) or opens the viewer window.
///
/// A scene that fails to load aborts the run before any rendering.
pub fn run(config: ViewerConfig) -> Result<()> {
    let scene = load_gltf_file(&config.scene_path)?;
    let shaders = config.shader_sources()?;

    let bounds = scene.bounds();
    if bounds.is_empty() {
        log::warn!("Scene has no measurable geometry");
    } else {
        log::info!("Scene bounds: min {} max {}", bounds.min, bounds.max);
    }
    let framing = SceneFraming::from_bounds(bounds);
    let camera = config.lookat.unwrap_or_else(|| framing.default_camera());

    match &config.output {
        Some(output) => render_headless(&config, &scene, &shaders, &framing, &camera, output),
        None => run_interactive(config, scene, shaders, framing, camera),
    }
}

/// Prints the adapter wgpu selects on this machine.
pub fn print_info() -> Result<()> {
    let gpu = pollster::block_on(GpuContext::new_headless())?;
    let info = gpu.adapter_info();
    println!("Adapter: {}", info.name);
    println!("Backend: {:?}", info.backend);
    println!("Device type: {:?}", info.device_type);
    println!("Driver: {} {}", info.driver, info.driver_info);
    Ok(())
}

fn render_headless(
    config: &ViewerConfig,
    scene: &GltfScene,
    shaders: &ShaderSources,
    framing: &SceneFraming,
    camera: &Camera,
    output: &std::path::Path,
) -> Result<()> {
    let gpu = pollster::block_on(GpuContext::new_headless())?;
    let projection = framing.projection(config.aspect_ratio());
    let image = pollster::block_on(render_to_image(
        &gpu,
        scene,
        shaders,
        &camera.view_matrix(),
        &projection,
        (config.width, config.height),
    ))?;
    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Wrote {}x{} image to {}", config.width, config.height, output.display());
    Ok(())
}

fn run_interactive(
    config: ViewerConfig,
    scene: GltfScene,
    shaders: ShaderSources,
    framing: SceneFraming,
    camera: Camera,
) -> Result<()> {
    let mut controller = ViewerCameraController::new(
        config.controller,
        framing.controller_speed(),
        glam::Vec3::Y,
    );
    controller.set_camera(camera);

    let event_loop = EventLoop::new()?;
    let mut app = ViewerApp {
        config,
        scene,
        shaders,
        framing,
        controller,
        input: WinitInput::new(),
        clock: FrameClock::new(),
        window: None,
        graphics: None,
        error: None,
    };

    log::info!("Controls: left drag + WASD/QE/arrows (first person), middle drag + Shift/Ctrl (trackball), Escape to quit");
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// GPU resources tied to the window surface.
struct Graphics {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    gui: Gui,
}

impl Graphics {
    fn new(window: Arc<Window>, scene: &GltfScene, shaders: &ShaderSources) -> Result<Self> {
        let size = window.inner_size();
        let (gpu, surface) = pollster::block_on(GpuContext::for_window(window.clone()))?;

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface reports no supported formats"))?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let renderer = pollster::block_on(SceneRenderer::new(
            gpu.device(),
            format,
            shaders,
            scene,
            (surface_config.width, surface_config.height),
        ))?;
        let gui = Gui::new(&window, gpu.device(), format);

        Ok(Self {
            gpu,
            surface,
            surface_config,
            renderer,
            gui,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.renderer.resize(self.gpu.device(), (width, height));
    }

    fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height as f32
    }
}

struct ViewerApp {
    config: ViewerConfig,
    scene: GltfScene,
    shaders: ShaderSources,
    framing: SceneFraming,
    controller: ViewerCameraController,
    input: WinitInput,
    clock: FrameClock,
    window: Option<Arc<Window>>,
    graphics: Option<Graphics>,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    /// Scene, then GUI, then the camera update for the time the previous frame took.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(graphics)) = (&self.window, &mut self.graphics) else {
            return;
        };

        let frame = match graphics.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = window.inner_size();
                graphics.resize(size.width, size.height);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface is out of memory");
                self.error = Some(anyhow!("Surface is out of memory"));
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("Skipping frame: {e}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let projection = self.framing.projection(graphics.aspect_ratio());
        let view_matrix = self.controller.camera().view_matrix();

        let mut encoder = graphics
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        graphics.renderer.render(
            &graphics.gpu,
            &mut encoder,
            &view,
            &self.scene,
            &view_matrix,
            &projection,
        );

        let clock = &self.clock;
        let controller = &mut self.controller;
        let size = [graphics.surface_config.width, graphics.surface_config.height];
        let gui_buffers = graphics.gui.render(&graphics.gpu, window, &mut encoder, &view, size, |ctx| {
            viewer_panel(ctx, clock, controller)
        });

        graphics
            .gpu
            .queue()
            .submit(gui_buffers.into_iter().chain(std::iter::once(encoder.finish())));
        window.pre_present_notify();
        frame.present();

        let elapsed = self.clock.tick();
        if !graphics.gui.wants_input() {
            self.controller.update(elapsed, &self.input);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("glTF Viewer")
                .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                self.fail(event_loop, anyhow!("Failed to create window: {e}"));
                return;
            }
        };

        match Graphics::new(window.clone(), &self.scene, &self.shaders) {
            Ok(graphics) => {
                self.window = Some(window);
                self.graphics = Some(graphics);
            }
            Err(e) => self.fail(event_loop, e.context("Failed to initialize renderer")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let consumed_by_gui = match (&mut self.graphics, &self.window) {
            (Some(graphics), Some(window)) => graphics.gui.on_window_event(window, &event),
            _ => false,
        };
        self.input.process_event(&event);

        let escape_pressed = matches!(event, WindowEvent::KeyboardInput { .. })
            && self.input.is_down(Button::Escape);
        if escape_pressed && !consumed_by_gui {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(graphics) = &mut self.graphics {
                    graphics.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
