//! Glyph rasterization for the caption and subtitle.
//!
//! Every glyph the overlay can show is rasterized once at start-up into an
//! RGBA atlas: white texels carrying coverage in alpha, tinted per vertex.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::caption::NBSP;

/// System fonts probed when no font file is configured.
pub const FALLBACK_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const ATLAS_MAX_WIDTH: u32 = 1024;
const GLYPH_PADDING: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("failed to read font {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse font {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("font has no horizontal line metrics")]
    NoLineMetrics,
    #[error("glyph atlas of {width}x{height} exceeds the GPU texture limit of {limit}")]
    AtlasTooLarge { width: u32, height: u32, limit: u32 },
}

/// Text roles rasterized at their own pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Caption,
    Subtitle,
}

/// Vertical font metrics in physical pixels, y up from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl LineMetrics {
    pub fn height(&self) -> f32 {
        self.ascent - self.descent
    }
}

/// Horizontal and vertical measurements the layout needs.
pub trait Measure {
    fn advance(&self, face: Face, ch: char) -> f32;
    fn line(&self, face: Face) -> LineMetrics;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasGlyph {
    pub advance: f32,
    /// Bitmap offset from the pen position, y up.
    pub xmin: f32,
    pub ymin: f32,
    pub width: u32,
    pub height: u32,
    /// `[u0, v0, u1, v1]` in atlas texture space.
    pub uv: [f32; 4],
}

pub struct GlyphAtlas {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 texels.
    pub pixels: Vec<u8>,
    glyphs: HashMap<(Face, char), AtlasGlyph>,
    lines: HashMap<Face, LineMetrics>,
}

impl GlyphAtlas {
    /// Rasterizes the distinct characters of each `(face, px, text)` entry.
    ///
    /// Fails without allocating texels when the packed atlas would not fit a
    /// `max_dimension` square texture.
    pub fn build(
        font: &fontdue::Font,
        faces: &[(Face, f32, &str)],
        max_dimension: u32,
    ) -> Result<Self, TextError> {
        let mut lines = HashMap::new();
        let mut bitmaps = Vec::new();

        for &(face, px, text) in faces {
            let metrics = font
                .horizontal_line_metrics(px)
                .ok_or(TextError::NoLineMetrics)?;
            lines.insert(
                face,
                LineMetrics {
                    ascent: metrics.ascent,
                    descent: metrics.descent,
                },
            );

            let mut seen = Vec::new();
            for ch in text.chars().map(canonical) {
                if seen.contains(&ch) {
                    continue;
                }
                seen.push(ch);
                let (metrics, coverage) = font.rasterize(ch, px);
                bitmaps.push((face, ch, metrics, coverage));
            }
        }

        let sizes: Vec<(u32, u32)> = bitmaps
            .iter()
            .map(|(_, _, metrics, _)| (metrics.width as u32, metrics.height as u32))
            .collect();
        let packing = pack_shelves(&sizes, ATLAS_MAX_WIDTH.min(max_dimension), GLYPH_PADDING);
        packing.check_limit(max_dimension)?;

        let mut pixels = vec![0u8; (packing.width * packing.height * 4) as usize];
        let mut glyphs = HashMap::with_capacity(bitmaps.len());
        for ((face, ch, metrics, coverage), origin) in bitmaps.into_iter().zip(&packing.origins) {
            let (w, h) = (metrics.width as u32, metrics.height as u32);
            for row in 0..h {
                for col in 0..w {
                    let alpha = coverage[(row * w + col) as usize];
                    let index = (((origin[1] + row) * packing.width + origin[0] + col) * 4) as usize;
                    pixels[index..index + 4].copy_from_slice(&[255, 255, 255, alpha]);
                }
            }
            let uv = [
                origin[0] as f32 / packing.width as f32,
                origin[1] as f32 / packing.height as f32,
                (origin[0] + w) as f32 / packing.width as f32,
                (origin[1] + h) as f32 / packing.height as f32,
            ];
            glyphs.insert(
                (face, ch),
                AtlasGlyph {
                    advance: metrics.advance_width,
                    xmin: metrics.xmin as f32,
                    ymin: metrics.ymin as f32,
                    width: w,
                    height: h,
                    uv,
                },
            );
        }

        debug!(
            width = packing.width,
            height = packing.height,
            glyphs = glyphs.len(),
            "built glyph atlas"
        );

        Ok(Self {
            width: packing.width,
            height: packing.height,
            pixels,
            glyphs,
            lines,
        })
    }

    pub fn glyph(&self, face: Face, ch: char) -> Option<&AtlasGlyph> {
        self.glyphs.get(&(face, canonical(ch)))
    }

    /// Atlas with hand-made glyph entries and no texels worth sampling.
    #[cfg(test)]
    pub(crate) fn from_glyphs(
        glyphs: impl IntoIterator<Item = ((Face, char), AtlasGlyph)>,
        line: LineMetrics,
    ) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![0; 4],
            glyphs: glyphs.into_iter().collect(),
            lines: [(Face::Caption, line), (Face::Subtitle, line)]
                .into_iter()
                .collect(),
        }
    }
}

impl Measure for GlyphAtlas {
    fn advance(&self, face: Face, ch: char) -> f32 {
        self.glyph(face, ch).map_or(0.0, |glyph| glyph.advance)
    }

    fn line(&self, face: Face) -> LineMetrics {
        self.lines.get(&face).copied().unwrap_or_default()
    }
}

/// Non-breaking spaces share the plain space glyph.
fn canonical(ch: char) -> char {
    if ch == NBSP {
        ' '
    } else {
        ch
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfPacking {
    pub width: u32,
    pub height: u32,
    /// Top-left corner of each input rectangle, in input order.
    pub origins: Vec<[u32; 2]>,
}

impl ShelfPacking {
    pub fn check_limit(&self, limit: u32) -> Result<(), TextError> {
        if self.width > limit || self.height > limit {
            return Err(TextError::AtlasTooLarge {
                width: self.width,
                height: self.height,
                limit,
            });
        }
        Ok(())
    }
}

/// Packs rectangles left to right into rows no wider than `max_width`.
pub fn pack_shelves(sizes: &[(u32, u32)], max_width: u32, padding: u32) -> ShelfPacking {
    let mut origins = Vec::with_capacity(sizes.len());
    let mut cursor_x = padding;
    let mut cursor_y = padding;
    let mut shelf_height = 0;
    let mut used_width = padding;

    for &(w, h) in sizes {
        if cursor_x > padding && cursor_x + w + padding > max_width {
            cursor_x = padding;
            cursor_y += shelf_height + padding;
            shelf_height = 0;
        }
        origins.push([cursor_x, cursor_y]);
        cursor_x += w + padding;
        used_width = used_width.max(cursor_x);
        shelf_height = shelf_height.max(h);
    }

    ShelfPacking {
        width: used_width.max(1),
        height: (cursor_y + shelf_height + padding).max(1),
        origins,
    }
}

/// Loads the configured font, or the first system fallback that exists.
///
/// `Ok(None)` means no font could be found at all.
pub fn load_font(path: Option<&Path>) -> Result<Option<(PathBuf, fontdue::Font)>, TextError> {
    let candidate = match path {
        Some(path) => Some(path.to_path_buf()),
        None => FALLBACK_FONTS
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.is_file()),
    };
    let Some(candidate) = candidate else {
        return Ok(None);
    };

    let bytes = std::fs::read(&candidate).map_err(|source| TextError::Read {
        path: candidate.clone(),
        source,
    })?;
    let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(
        |reason| TextError::Parse {
            path: candidate.clone(),
            reason: reason.to_string(),
        },
    )?;
    Ok(Some((candidate, font)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shelves_wrap_at_max_width() {
        let packing = pack_shelves(&[(10, 8), (10, 12), (10, 5)], 24, 1);
        assert_eq!(packing.origins, vec![[1, 1], [12, 1], [1, 14]]);
        assert_eq!(packing.width, 23);
        assert_eq!(packing.height, 20);
    }

    #[test]
    fn oversized_rect_gets_its_own_shelf() {
        let packing = pack_shelves(&[(4, 4), (50, 6)], 16, 0);
        assert_eq!(packing.origins, vec![[0, 0], [0, 4]]);
        assert_eq!(packing.width, 50);
    }

    #[test]
    fn empty_input_packs_to_unit_texture() {
        let packing = pack_shelves(&[], 64, 1);
        assert!(packing.origins.is_empty());
        assert!(packing.width >= 1 && packing.height >= 1);
    }

    #[test]
    fn packing_over_texture_limit_is_rejected() {
        let packing = pack_shelves(&[(600, 900), (600, 900)], 1024, 1);
        assert_eq!(packing.height, 1803);
        assert!(packing.check_limit(2048).is_ok());
        assert!(matches!(
            packing.check_limit(1024),
            Err(TextError::AtlasTooLarge {
                height: 1803,
                limit: 1024,
                ..
            })
        ));
    }

    #[test]
    fn huge_caption_does_not_build_an_atlas() {
        // Needs a system font; machines without one have nothing to check.
        let Ok(Some((_, font))) = load_font(None) else {
            return;
        };
        let faces = [(Face::Caption, 2000.0, "COMING SOON")];
        let err = GlyphAtlas::build(&font, &faces, 8192).err();
        assert!(matches!(err, Some(TextError::AtlasTooLarge { limit: 8192, .. })));

        let atlas = GlyphAtlas::build(&font, &[(Face::Caption, 56.0, "COMING SOON")], 2048)
            .expect("small atlas");
        assert!(atlas.width <= 2048 && atlas.height <= 2048);
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let dir = std::env::temp_dir().join("renderer-missing-font.ttf");
        let err = load_font(Some(&dir)).err().expect("read error");
        assert!(matches!(err, TextError::Read { .. }));
    }

    #[test]
    fn nbsp_shares_space_glyph() {
        assert_eq!(canonical(NBSP), ' ');
        assert_eq!(canonical('A'), 'A');
    }
}
