//! Placement of the logo box and the caption/subtitle column.
//!
//! All results are physical pixels with a top-left origin. Configured sizes
//! are logical and get multiplied by the window scale factor here.

use std::time::Duration;

use winit::dpi::PhysicalSize;

use super::caption::Caption;
use super::text::{Face, Measure};
use crate::types::OverlayConfig;

/// Horizontal breathing room kept on each side of wrapped subtitle lines.
const SUBTITLE_PADDING: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Largest size with the image's aspect ratio that fits a square box.
pub fn contain(box_size: f32, image: (u32, u32)) -> (f32, f32) {
    let (w, h) = (image.0 as f32, image.1 as f32);
    if w <= 0.0 || h <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (box_size / w).min(box_size / h);
    (w * scale, h * scale)
}

pub fn logo_rect(
    window: PhysicalSize<u32>,
    scale: f32,
    config: &OverlayConfig,
    image: (u32, u32),
) -> Rect {
    let (width, height) = contain(config.logo_size * scale, image);
    let centre_x = config.logo_anchor[0] * window.width as f32;
    let centre_y = config.logo_anchor[1] * window.height as f32;
    Rect {
        x: centre_x - width / 2.0,
        y: centre_y - height / 2.0,
        width,
        height,
    }
}

/// A character positioned on its baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedChar {
    pub ch: char,
    pub face: Face,
    /// Pen position.
    pub x: f32,
    pub baseline: f32,
    /// Wave start for caption letters; zero for subtitle characters.
    pub delay: Duration,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    pub caption: Vec<PlacedChar>,
    pub subtitle: Vec<PlacedChar>,
}

/// Greedy word wrap; a word wider than `max_width` gets a line of its own.
pub fn wrap_words(text: &str, max_width: f32, advance: impl Fn(char) -> f32) -> Vec<String> {
    let width_of = |line: &str| line.chars().map(&advance).sum::<f32>();
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if width_of(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lays out the caption row and subtitle block as one centred column.
pub fn layout_text(
    window: PhysicalSize<u32>,
    scale: f32,
    config: &OverlayConfig,
    measure: &impl Measure,
) -> TextLayout {
    let caption = Caption::new(config.caption.as_str(), config.letter_delay);
    let gap = config.letter_gap * scale;
    let letters: Vec<_> = caption
        .letters()
        .map(|letter| (letter, measure.advance(Face::Caption, letter.ch)))
        .collect();
    let row_width = letters.iter().map(|(_, advance)| advance).sum::<f32>()
        + gap * letters.len().saturating_sub(1) as f32;
    let caption_line = measure.line(Face::Caption);
    let caption_height = if letters.is_empty() {
        0.0
    } else {
        caption_line.height()
    };

    let line_height = config.subtitle_size * scale * config.subtitle_line_height;
    let wrap_width = (config.subtitle_max_width * scale)
        .min(window.width as f32 - 2.0 * SUBTITLE_PADDING * scale)
        .max(1.0);
    let lines = config
        .subtitle
        .as_deref()
        .map(|text| wrap_words(text, wrap_width, |ch| measure.advance(Face::Subtitle, ch)))
        .unwrap_or_default();

    let spacing = if caption_height > 0.0 && !lines.is_empty() {
        config.text_spacing * scale
    } else {
        0.0
    };
    let total_height = caption_height + spacing + line_height * lines.len() as f32;
    let centre_x = config.text_anchor[0] * window.width as f32;
    let top = config.text_anchor[1] * window.height as f32 - total_height / 2.0;

    let mut layout = TextLayout::default();

    let caption_baseline = top + caption_line.ascent;
    let mut pen = centre_x - row_width / 2.0;
    for (letter, advance) in letters {
        layout.caption.push(PlacedChar {
            ch: letter.ch,
            face: Face::Caption,
            x: pen,
            baseline: caption_baseline,
            delay: letter.delay,
        });
        pen += advance + gap;
    }

    let subtitle_line = measure.line(Face::Subtitle);
    let half_leading = (line_height - subtitle_line.height()) / 2.0;
    let mut line_top = top + caption_height + spacing;
    for line in &lines {
        let width: f32 = line
            .chars()
            .map(|ch| measure.advance(Face::Subtitle, ch))
            .sum();
        let baseline = line_top + half_leading + subtitle_line.ascent;
        let mut pen = centre_x - width / 2.0;
        for ch in line.chars() {
            layout.subtitle.push(PlacedChar {
                ch,
                face: Face::Subtitle,
                x: pen,
                baseline,
                delay: Duration::ZERO,
            });
            pen += measure.advance(Face::Subtitle, ch);
        }
        line_top += line_height;
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::text::LineMetrics;

    /// Monospace stand-in: every glyph advances 10 px at scale 1.
    struct Mono;

    impl Measure for Mono {
        fn advance(&self, _face: Face, _ch: char) -> f32 {
            10.0
        }

        fn line(&self, _face: Face) -> LineMetrics {
            LineMetrics {
                ascent: 8.0,
                descent: -2.0,
            }
        }
    }

    fn window() -> PhysicalSize<u32> {
        PhysicalSize::new(1000, 800)
    }

    #[test]
    fn contain_preserves_aspect_ratio() {
        assert_eq!(contain(300.0, (600, 300)), (300.0, 150.0));
        assert_eq!(contain(300.0, (100, 400)), (75.0, 300.0));
        assert_eq!(contain(300.0, (0, 10)), (0.0, 0.0));
    }

    #[test]
    fn logo_is_centred_on_anchor() {
        let config = OverlayConfig::default();
        let rect = logo_rect(window(), 2.0, &config, (200, 100));
        assert_eq!(rect.width, 600.0);
        assert_eq!(rect.height, 300.0);
        assert_eq!(rect.x + rect.width / 2.0, 500.0);
        assert!((rect.y + rect.height / 2.0 - 240.0).abs() < 1e-3);
    }

    #[test]
    fn wrap_breaks_between_words() {
        let lines = wrap_words("aa bb cc dd", 50.0, |_| 10.0);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);

        let lines = wrap_words("unbreakable x", 30.0, |_| 10.0);
        assert_eq!(lines, vec!["unbreakable", "x"]);

        assert!(wrap_words("   ", 30.0, |_| 10.0).is_empty());
    }

    #[test]
    fn caption_row_is_centred_with_gaps() {
        let config = OverlayConfig {
            caption: "ABC".into(),
            letter_gap: 5.0,
            subtitle: None,
            ..OverlayConfig::default()
        };
        let layout = layout_text(window(), 1.0, &config, &Mono);
        let xs: Vec<f32> = layout.caption.iter().map(|c| c.x).collect();
        // Row width is 3 * 10 + 2 * 5 = 40, centred on x = 500.
        assert_eq!(xs, vec![480.0, 495.0, 510.0]);
        assert_eq!(layout.caption[2].delay, config.letter_delay * 2);
        // Only the caption row, 10 px tall, centred on y = 520.
        assert_eq!(layout.caption[0].baseline, 515.0 + 8.0);
        assert!(layout.subtitle.is_empty());
    }

    #[test]
    fn subtitle_sits_below_caption() {
        let config = OverlayConfig {
            caption: "AB".into(),
            letter_gap: 0.0,
            subtitle: Some("one two".into()),
            subtitle_size: 20.0,
            subtitle_line_height: 1.5,
            subtitle_max_width: 40.0,
            text_spacing: 32.0,
            ..OverlayConfig::default()
        };
        let layout = layout_text(window(), 1.0, &config, &Mono);

        // Caption 10 + spacing 32 + two 30 px lines = 102 tall.
        let top = 520.0 - 51.0;
        assert_eq!(layout.caption[0].baseline, top + 8.0);
        let first_line = top + 10.0 + 32.0;
        let baselines: Vec<f32> = layout.subtitle.iter().map(|c| c.baseline).collect();
        assert_eq!(baselines[0], first_line + 10.0 + 8.0);
        assert_eq!(baselines[3], first_line + 30.0 + 10.0 + 8.0);
        assert_eq!(layout.subtitle.len(), 6);
        assert_eq!(layout.subtitle[0].x, 485.0);
    }

    #[test]
    fn scale_factor_multiplies_logical_sizes() {
        let config = OverlayConfig {
            caption: "AB".into(),
            letter_gap: 10.0,
            subtitle: None,
            ..OverlayConfig::default()
        };
        let layout = layout_text(window(), 2.0, &config, &Mono);
        assert_eq!(layout.caption[1].x - layout.caption[0].x, 10.0 + 20.0);
    }
}
