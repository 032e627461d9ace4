use glam::Vec3;
use winit::window::Window;

use crate::camera::{CameraController, ControllerKind, ViewerCameraController};
use crate::core::{FrameClock, GpuContext};

/// egui context, winit integration and wgpu renderer for the debug window.
pub struct Gui {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Gui {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Feeds one window event to egui. Returns true when egui consumed it,
    /// such as a key typed into a focused widget.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// True while the pointer is over a GUI window or a widget has keyboard focus.
    pub fn wants_input(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.wants_keyboard_input()
    }

    /// Runs the GUI for one frame and records its draw into `encoder` on top
    /// of `target`. Returns extra command buffers to submit before `encoder`.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        build: impl FnMut(&egui::Context),
    ) -> Vec<wgpu::CommandBuffer> {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, build);
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(gpu.device(), gpu.queue(), *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: full_output.pixels_per_point,
        };
        let command_buffers = self.renderer.update_buffers(
            gpu.device(),
            gpu.queue(),
            encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
        command_buffers
    }
}

/// The "GUI" window: frame timing, camera state and controller selection.
pub fn viewer_panel(ctx: &egui::Context, clock: &FrameClock, controller: &mut ViewerCameraController) {
    egui::Window::new("GUI")
        .default_pos(egui::pos2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!(
                "Application average {:.3} ms/frame ({:.1} FPS)",
                clock.frame_time_ms(),
                clock.fps()
            ));

            egui::CollapsingHeader::new("Camera")
                .default_open(true)
                .show(ui, |ui| {
                    let camera = *controller.camera();
                    ui.monospace(format!("eye:    {}", format_vec(camera.eye())));
                    ui.monospace(format!("center: {}", format_vec(camera.center())));
                    ui.monospace(format!("up:     {}", format_vec(camera.up())));
                    ui.monospace(format!("front:  {}", format_vec(camera.front(true))));
                    ui.monospace(format!("left:   {}", format_vec(camera.left(true))));

                    if ui.button("CLI camera args to clipboard").clicked() {
                        ui.ctx().copy_text(camera.lookat_arg());
                    }

                    let mut kind = controller.kind();
                    ui.horizontal(|ui| {
                        for option in [ControllerKind::Trackball, ControllerKind::FirstPerson] {
                            ui.radio_value(&mut kind, option, option.label());
                        }
                    });
                    controller.switch_to(kind);
                });
        });
}

fn format_vec(v: Vec3) -> String {
    format!("{:8.3} {:8.3} {:8.3}", v.x, v.y, v.z)
}
