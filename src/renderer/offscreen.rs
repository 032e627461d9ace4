use anyhow::{ensure, Context, Result};
use glam::Mat4;
use image::RgbImage;

use super::{SceneRenderer, ShaderSources};
use crate::core::GpuContext;
use crate::loaders::GltfScene;

const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Renders one frame of `scene` into an offscreen texture and reads it back.
///
/// wgpu textures have their origin at the top-left, so rows come back in
/// image order and are not flipped.
pub async fn render_to_image(
    gpu: &GpuContext,
    scene: &GltfScene,
    shaders: &ShaderSources,
    view: &Mat4,
    projection: &Mat4,
    (width, height): (u32, u32),
) -> Result<RgbImage> {
    ensure!(width > 0 && height > 0, "Image size must be non-zero, got {width}x{height}");
    let device = gpu.device();

    let mut renderer = SceneRenderer::new(device, OFFSCREEN_FORMAT, shaders, scene, (width, height))
        .await
        .context("Failed to create scene renderer")?;

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Color Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let padded_bytes_per_row = wgpu::util::align_to(width * 4, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT);
    let readback_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Offscreen Readback Buffer"),
        size: padded_bytes_per_row as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Offscreen Encoder"),
    });
    renderer.render(gpu, &mut encoder, &texture_view, scene, view, projection);
    encoder.copy_texture_to_buffer(
        texture.as_image_copy(),
        wgpu::TexelCopyBufferInfo {
            buffer: &readback_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    gpu.queue().submit(std::iter::once(encoder.finish()));

    let data = gpu
        .read_buffer_sync(&readback_buffer)
        .context("Failed to read back rendered image")?;
    rgba_rows_to_rgb(&data, width, height, padded_bytes_per_row as usize)
}

/// Drops row padding and the alpha channel from tightly sized RGBA8 rows.
pub fn rgba_rows_to_rgb(
    data: &[u8],
    width: u32,
    height: u32,
    padded_bytes_per_row: usize,
) -> Result<RgbImage> {
    let row_bytes = width as usize * 4;
    ensure!(row_bytes > 0, "Image width must be non-zero");
    ensure!(
        padded_bytes_per_row >= row_bytes,
        "Row pitch {padded_bytes_per_row} is smaller than {row_bytes} bytes of pixels"
    );
    ensure!(
        data.len() >= padded_bytes_per_row * height as usize,
        "Readback holds {} bytes, expected {} rows of {padded_bytes_per_row}",
        data.len(),
        height
    );

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for row in data.chunks_exact(padded_bytes_per_row).take(height as usize) {
        for pixel in row[..row_bytes].chunks_exact(4) {
            rgb.extend_from_slice(&pixel[..3]);
        }
    }
    RgbImage::from_raw(width, height, rgb).context("Pixel buffer does not match image size")
}
