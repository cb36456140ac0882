//! Decorative layer drawn over the background: logo, wave caption, subtitle.
//!
//! - `caption` turns the caption string into staggered letters and computes
//!   the per-letter wave offset.
//! - `text` rasterizes glyphs into an atlas with `fontdue`.
//! - `layout` positions the logo box and the text column.
//!
//! [`OverlayScene`] combines them into one vertex batch per frame. The GPU
//! side lives in `gpu::overlay`.

pub mod caption;
pub mod layout;
pub mod text;

use std::ops::Range;
use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use winit::dpi::PhysicalSize;

use crate::timeline::FadeEnvelope;
use crate::types::OverlayConfig;

use self::layout::{PlacedChar, Rect, TextLayout};
use self::text::GlyphAtlas;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct OverlayVertex {
    /// Clip-space position.
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl OverlayVertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Vertices for one frame, split by the texture each range samples.
#[derive(Debug, Default)]
pub struct OverlayBatch {
    pub vertices: Vec<OverlayVertex>,
    pub logo: Range<u32>,
    pub text: Range<u32>,
}

impl OverlayBatch {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.logo = 0..0;
        self.text = 0..0;
    }

    fn mark(&self) -> u32 {
        self.vertices.len() as u32
    }
}

pub struct OverlayScene {
    config: OverlayConfig,
    logo_size: Option<(u32, u32)>,
    logo_rect: Option<Rect>,
    text: TextLayout,
    fade: FadeEnvelope,
    window: PhysicalSize<u32>,
    scale: f32,
}

impl OverlayScene {
    /// `logo_size` is the decoded logo's pixel size, if one was loaded.
    pub fn new(config: OverlayConfig, logo_size: Option<(u32, u32)>) -> Self {
        let fade = FadeEnvelope::new(Duration::ZERO, config.subtitle_fade);
        Self {
            config,
            logo_size,
            logo_rect: None,
            text: TextLayout::default(),
            fade,
            window: PhysicalSize::new(0, 0),
            scale: 1.0,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Recomputes positions for a new window size or scale factor.
    pub fn relayout(&mut self, window: PhysicalSize<u32>, scale: f32, atlas: Option<&GlyphAtlas>) {
        self.window = window;
        self.scale = scale;
        self.logo_rect = self
            .logo_size
            .map(|size| layout::logo_rect(window, scale, &self.config, size));
        self.text = match atlas {
            Some(atlas) => layout::layout_text(window, scale, &self.config, atlas),
            None => TextLayout::default(),
        };
    }

    /// Fills `batch` with the overlay as it looks `elapsed` after start-up.
    pub fn build(&self, elapsed: Duration, atlas: Option<&GlyphAtlas>, batch: &mut OverlayBatch) {
        batch.clear();
        if self.window.width == 0 || self.window.height == 0 {
            return;
        }

        let start = batch.mark();
        if let Some(rect) = self.logo_rect {
            self.push_quad(batch, rect, [0.0, 0.0, 1.0, 1.0], [1.0; 4]);
        }
        batch.logo = start..batch.mark();

        let start = batch.mark();
        if let Some(atlas) = atlas {
            self.push_caption(batch, atlas, elapsed);
            let mut color = self.config.subtitle_color;
            color[3] *= self.fade.opacity(elapsed);
            if color[3] > 0.0 {
                for placed in &self.text.subtitle {
                    self.push_glyph(batch, atlas, placed, 0.0, color);
                }
            }
        }
        batch.text = start..batch.mark();
    }

    fn push_caption(&self, batch: &mut OverlayBatch, atlas: &GlyphAtlas, elapsed: Duration) {
        let depth = self.config.shadow_depth.max(0.0).round() as u32;
        for placed in &self.text.caption {
            let lift = caption::wave_offset(elapsed, placed.delay, self.config.wave) * self.scale;
            if let Some(shadow) = self.config.caption_shadow {
                for step in (1..=depth).rev() {
                    self.push_glyph(batch, atlas, placed, step as f32 * self.scale - lift, shadow);
                }
            }
            self.push_glyph(batch, atlas, placed, -lift, self.config.caption_color);
        }
    }

    fn push_glyph(
        &self,
        batch: &mut OverlayBatch,
        atlas: &GlyphAtlas,
        placed: &PlacedChar,
        offset_y: f32,
        color: [f32; 4],
    ) {
        let Some(glyph) = atlas.glyph(placed.face, placed.ch) else {
            return;
        };
        if glyph.width == 0 || glyph.height == 0 {
            return;
        }
        let rect = Rect {
            x: placed.x + glyph.xmin,
            y: placed.baseline - glyph.ymin - glyph.height as f32 + offset_y,
            width: glyph.width as f32,
            height: glyph.height as f32,
        };
        self.push_quad(batch, rect, glyph.uv, color);
    }

    fn push_quad(&self, batch: &mut OverlayBatch, rect: Rect, uv: [f32; 4], color: [f32; 4]) {
        let to_clip = |x: f32, y: f32| {
            [
                x / self.window.width as f32 * 2.0 - 1.0,
                1.0 - y / self.window.height as f32 * 2.0,
            ]
        };
        let [u0, v0, u1, v1] = uv;
        let top_left = OverlayVertex {
            position: to_clip(rect.x, rect.y),
            uv: [u0, v0],
            color,
        };
        let top_right = OverlayVertex {
            position: to_clip(rect.x + rect.width, rect.y),
            uv: [u1, v0],
            color,
        };
        let bottom_left = OverlayVertex {
            position: to_clip(rect.x, rect.y + rect.height),
            uv: [u0, v1],
            color,
        };
        let bottom_right = OverlayVertex {
            position: to_clip(rect.x + rect.width, rect.y + rect.height),
            uv: [u1, v1],
            color,
        };
        batch.vertices.extend_from_slice(&[
            top_left,
            bottom_left,
            top_right,
            top_right,
            bottom_left,
            bottom_right,
        ]);
    }
}
