use std::sync::Arc;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::error::Error;
use crate::renderer::overlay::OverlayRenderer;
use crate::renderer::pipeline::ScenePipeline;
use crate::scene::submarine::SceneKey;
use crate::scene::{Scene, SceneConfig};
use crate::ui;

/// Maps the keys the scene listens to. Everything else is ignored.
pub fn scene_key(key: KeyCode) -> Option<SceneKey> {
    match key {
        KeyCode::PageUp => Some(SceneKey::PageUp),
        KeyCode::PageDown => Some(SceneKey::PageDown),
        KeyCode::ArrowUp => Some(SceneKey::Up),
        KeyCode::ArrowDown => Some(SceneKey::Down),
        KeyCode::ArrowLeft => Some(SceneKey::Left),
        KeyCode::ArrowRight => Some(SceneKey::Right),
        KeyCode::F1 => Some(SceneKey::F1),
        _ => None,
    }
}

pub struct App {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: ScenePipeline,
    scene: Scene,
    egui_ctx: egui::Context,
    egui_winit: egui_winit::State,
    overlay: OverlayRenderer,
    window: Arc<Window>,
}

impl App {
    pub fn new(window: Arc<Window>, scene_config: &SceneConfig) -> Result<Self, Error> {
        let scene = Scene::new(scene_config)?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = crate::renderer::create_instance();
        let surface = instance.create_surface(window.clone())?;
        let (adapter, device, queue) =
            crate::renderer::request_device(&instance, Some(&surface), "GPU Device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = ScenePipeline::new(&device, surface_format, width, height, scene.ground());

        let egui_ctx = egui::Context::default();
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let overlay = OverlayRenderer::new(&device, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            scene,
            egui_ctx,
            egui_winit,
            overlay,
            window,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.pipeline.resize(&self.device, width, height);
    }

    pub fn tick(&mut self) {
        self.scene.tick();
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let egui_response = self.egui_winit.on_window_event(&self.window, event);
        if egui_response.consumed {
            return true;
        }

        match event {
            WindowEvent::Resized(size) => {
                self.resize(size.width, size.height);
                true
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return false;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return false;
                };
                if let Some(key) = scene_key(code) {
                    self.scene.handle_key(key);
                    self.request_redraw();
                }
                true
            }
            _ => false,
        }
    }

    pub fn render(&mut self) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let frame = self.scene.compose_frame(aspect);

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.resize(self.config.width, self.config.height);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let mut full_output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw_help_overlay(ctx, frame.overlay.as_ref());
        });
        let platform_output = std::mem::take(&mut full_output.platform_output);
        self.egui_winit
            .handle_platform_output(&self.window, platform_output);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        self.pipeline
            .render(&self.queue, &mut encoder, &view, &frame);
        let freed = self.overlay.paint(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            &self.egui_ctx,
            full_output,
            [self.config.width, self.config.height],
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // Poll device to let Metal release completed command buffer resources.
        self.device.poll(wgpu::Maintain::Poll);

        self.overlay.free_textures(&freed);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Wait for all GPU work to finish before the surface is destroyed,
        // avoiding the Vulkan "SurfaceSemaphores still in use" panic.
        self.device.poll(wgpu::Maintain::Wait);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_navigation_keys() {
        assert_eq!(scene_key(KeyCode::PageUp), Some(SceneKey::PageUp));
        assert_eq!(scene_key(KeyCode::ArrowLeft), Some(SceneKey::Left));
        assert_eq!(scene_key(KeyCode::F1), Some(SceneKey::F1));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(scene_key(KeyCode::KeyW), None);
        assert_eq!(scene_key(KeyCode::F2), None);
        assert_eq!(scene_key(KeyCode::Space), None);
    }
}
