use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use wgpu::util::{DeviceExt, TextureDataOrder};
use winit::dpi::PhysicalSize;

use crate::overlay::text::{self, Face, GlyphAtlas};
use crate::overlay::{OverlayBatch, OverlayScene, OverlayVertex};
use crate::types::OverlayConfig;

use super::pipeline::OverlayPipeline;

const INITIAL_VERTEX_CAPACITY: usize = 1024;

/// GPU side of the overlay: textures, bind groups and the per-frame vertex
/// buffer.
pub(crate) struct OverlayRenderer {
    pipeline: OverlayPipeline,
    scene: OverlayScene,
    font: Option<fontdue::Font>,
    atlas: Option<GlyphAtlas>,
    atlas_scale: f32,
    logo_group: Option<wgpu::BindGroup>,
    text_group: Option<wgpu::BindGroup>,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    batch: OverlayBatch,
}

impl OverlayRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: OverlayPipeline,
        config: OverlayConfig,
        scale: f32,
    ) -> Self {
        let logo = config.logo.as_deref().and_then(|path| {
            match upload_logo(device, queue, &pipeline, path) {
                Ok(logo) => Some(logo),
                Err(err) => {
                    warn!(path = %path.display(), "skipping logo: {err:#}");
                    None
                }
            }
        });
        let (logo_size, logo_group) = match logo {
            Some((size, group)) => (Some(size), Some(group)),
            None => (None, None),
        };

        let font = match text::load_font(config.font.as_deref()) {
            Ok(Some((path, font))) => {
                info!(path = %path.display(), "loaded overlay font");
                Some(font)
            }
            Ok(None) => {
                warn!("no usable font found; caption and subtitle are disabled");
                None
            }
            Err(err) => {
                warn!("caption and subtitle are disabled: {err}");
                None
            }
        };

        let mut renderer = Self {
            pipeline,
            scene: OverlayScene::new(config, logo_size),
            font,
            atlas: None,
            atlas_scale: scale,
            logo_group,
            text_group: None,
            vertex_buffer: create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY),
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            batch: OverlayBatch::default(),
        };
        renderer.rebuild_atlas(device, queue, scale);
        renderer
    }

    /// Repositions everything; rasterizes glyphs again if the scale changed.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: PhysicalSize<u32>,
        scale: f32,
    ) {
        if (scale - self.atlas_scale).abs() > f32::EPSILON {
            self.rebuild_atlas(device, queue, scale);
        }
        self.scene.relayout(size, scale, self.atlas.as_ref());
    }

    /// Builds this frame's vertices and uploads them.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, elapsed: Duration) {
        self.scene.build(elapsed, self.atlas.as_ref(), &mut self.batch);
        if self.batch.vertices.is_empty() {
            return;
        }
        if self.batch.vertices.len() > self.vertex_capacity {
            self.vertex_capacity = self.batch.vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
            debug!(capacity = self.vertex_capacity, "grew overlay vertex buffer");
        }
        queue.write_buffer(
            &self.vertex_buffer,
            0,
            bytemuck::cast_slice(&self.batch.vertices),
        );
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.batch.vertices.is_empty() {
            return;
        }
        pass.set_pipeline(&self.pipeline.pipeline);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        if let Some(group) = self.logo_group.as_ref() {
            if !self.batch.logo.is_empty() {
                pass.set_bind_group(0, group, &[]);
                pass.draw(self.batch.logo.clone(), 0..1);
            }
        }
        if let Some(group) = self.text_group.as_ref() {
            if !self.batch.text.is_empty() {
                pass.set_bind_group(0, group, &[]);
                pass.draw(self.batch.text.clone(), 0..1);
            }
        }
    }

    fn rebuild_atlas(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scale: f32) {
        self.atlas_scale = scale;
        let Some(font) = self.font.as_ref() else {
            return;
        };

        let config = self.scene.config();
        let subtitle = config.subtitle.as_deref().unwrap_or_default();
        let faces = [
            (Face::Caption, config.caption_size * scale, config.caption.as_str()),
            (Face::Subtitle, config.subtitle_size * scale, subtitle),
        ];
        let limit = device.limits().max_texture_dimension_2d;
        match GlyphAtlas::build(font, &faces, limit) {
            Ok(atlas) => {
                let texture = upload_rgba(
                    device,
                    queue,
                    "glyph atlas",
                    atlas.width,
                    atlas.height,
                    &atlas.pixels,
                );
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                self.text_group = Some(self.pipeline.bind_texture(device, "glyph atlas", &view));
                self.atlas = Some(atlas);
            }
            Err(err) => {
                warn!("caption and subtitle are disabled: {err}");
                self.atlas = None;
                self.text_group = None;
            }
        }
    }
}

fn upload_logo(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &OverlayPipeline,
    path: &Path,
) -> Result<((u32, u32), wgpu::BindGroup)> {
    logo_dimensions(path, device.limits().max_texture_dimension_2d)?;
    let image = image::open(path)
        .with_context(|| format!("failed to decode logo at {}", path.display()))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let texture = upload_rgba(device, queue, "logo", width, height, rgba.as_raw());
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    debug!(width, height, "uploaded logo");
    Ok(((width, height), pipeline.bind_texture(device, "logo", &view)))
}

/// Reads the logo header and rejects images a texture cannot hold.
fn logo_dimensions(path: &Path, limit: u32) -> Result<(u32, u32)> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("failed to read logo at {}", path.display()))?;
    if width > limit || height > limit {
        bail!("logo is {width}x{height}, GPU max texture dimension is {limit}");
    }
    Ok((width, height))
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    data: &[u8],
) -> wgpu::Texture {
    device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        data,
    )
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("overlay vertices"),
        size: (capacity * std::mem::size_of::<OverlayVertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn oversized_logo_is_rejected_before_decoding() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("logo.png");
        image::RgbaImage::new(64, 16).save(&path).unwrap();

        assert_eq!(logo_dimensions(&path, 2048).unwrap(), (64, 16));
        let err = logo_dimensions(&path, 32).unwrap_err();
        assert!(format!("{err:#}").contains("64x16"));
    }

    #[test]
    fn unreadable_logo_is_an_error() {
        let root = TempDir::new().unwrap();
        let err = logo_dimensions(&root.path().join("absent.png"), 2048).unwrap_err();
        assert!(format!("{err:#}").contains("absent.png"));
    }
}
