/// Paints egui output on top of an already rendered target. Runs in its own
/// pass with egui's screen-space projection, so the 3D pass state is untouched.
pub struct OverlayRenderer {
    renderer: egui_wgpu::Renderer,
}

impl OverlayRenderer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            renderer: egui_wgpu::Renderer::new(device, format, None, 1, false),
        }
    }

    /// Records the overlay pass into `encoder`. Returns the textures to release
    /// once the encoder has been submitted.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        ctx: &egui::Context,
        output: egui::FullOutput,
        size_in_pixels: [u32; 2],
    ) -> Vec<egui::TextureId> {
        let paint_jobs = ctx.tessellate(output.shapes, output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: output.pixels_per_point,
        };

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let callback_buffers =
            self.renderer
                .update_buffers(device, queue, encoder, &paint_jobs, &screen_descriptor);
        if !callback_buffers.is_empty() {
            queue.submit(callback_buffers);
        }

        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            })
            .forget_lifetime();
        self.renderer
            .render(&mut pass, &paint_jobs, &screen_descriptor);
        drop(pass);

        output.textures_delta.free
    }

    pub fn free_textures(&mut self, ids: &[egui::TextureId]) {
        for id in ids {
            self.renderer.free_texture(id);
        }
    }
}
