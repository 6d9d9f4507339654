use std::path::Path;

use crate::cli::Args;
use crate::error::Error;
use crate::renderer::overlay::OverlayRenderer;
use crate::renderer::pipeline::ScenePipeline;
use crate::scene::Scene;
use crate::ui;

/// sRGB RGBA so the readback can be written to PNG without swizzling.
const SCREENSHOT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Advances the scene `args.ticks` times, renders one frame offscreen and
/// writes it to `output`.
pub fn render_screenshot(args: &Args, output: &Path) -> Result<(), Error> {
    let width = args.width.max(1);
    let height = args.height.max(1);

    let mut scene = Scene::new(&args.scene_config())?;
    for _ in 0..args.ticks {
        scene.tick();
    }
    let frame = scene.compose_frame(width as f32 / height as f32);

    let instance = crate::renderer::create_instance();
    let (_adapter, device, queue) =
        crate::renderer::request_device(&instance, None, "Screenshot Device")?;

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Screenshot Target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: SCREENSHOT_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let pipeline = ScenePipeline::new(&device, SCREENSHOT_FORMAT, width, height, scene.ground());
    let mut overlay = OverlayRenderer::new(&device, SCREENSHOT_FORMAT);

    let egui_ctx = egui::Context::default();
    let raw_input = egui::RawInput {
        screen_rect: Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(width as f32, height as f32),
        )),
        ..Default::default()
    };
    let full_output = egui_ctx.run(raw_input, |ctx| {
        ui::draw_help_overlay(ctx, frame.overlay.as_ref());
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Screenshot Encoder"),
    });
    pipeline.render(&queue, &mut encoder, &view, &frame);
    let freed = overlay.paint(
        &device,
        &queue,
        &mut encoder,
        &view,
        &egui_ctx,
        full_output,
        [width, height],
    );

    let padded_row = padded_bytes_per_row(width);
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Screenshot Readback"),
        size: padded_row as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    queue.submit(std::iter::once(encoder.finish()));
    overlay.free_textures(&freed);

    let pixels = read_buffer(&device, &readback, width, height)?;
    let image = image::RgbaImage::from_raw(width, height, pixels)
        .ok_or(Error::ReadbackSize(width, height))?;
    image.save(output)?;

    log::info!(
        "Screenshot saved to {} after {} ticks",
        output.display(),
        args.ticks
    );
    Ok(())
}

/// Rows in a texture-to-buffer copy must be a multiple of 256 bytes.
fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Maps the readback buffer and strips row padding.
fn read_buffer(
    device: &wgpu::Device,
    buffer: &wgpu::Buffer,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, Error> {
    let slice = buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::Maintain::Wait);
    rx.recv().map_err(|_| Error::ReadbackDropped)??;

    let padded_row = padded_bytes_per_row(width) as usize;
    let row = width as usize * 4;
    let mut pixels = Vec::with_capacity(row * height as usize);
    {
        let data = slice.get_mapped_range();
        for chunk in data.chunks_exact(padded_row).take(height as usize) {
            pixels.extend_from_slice(&chunk[..row]);
        }
    }
    buffer.unmap();

    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
        assert_eq!(padded_bytes_per_row(500), 2048);
    }
}
