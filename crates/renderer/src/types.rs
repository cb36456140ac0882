use std::path::PathBuf;
use std::time::Duration;

/// Rejected renderer parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("base colour component {index} must be within [0, 1], got {value}")]
    BaseColor { index: usize, value: f32 },
    #[error("speed must be greater than zero, got {0}")]
    Speed(f32),
    #[error("amplitude must be >= 0, got {0}")]
    Amplitude(f32),
    #[error("{name} must be a finite number")]
    NonFinite { name: &'static str },
}

/// Parameters of the liquid background, fixed for the renderer's lifetime.
///
/// Changing any value means tearing the renderer down and mounting a new one;
/// there is no runtime mutation path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundConfig {
    /// RGB tint mixed into the palette at 20%.
    pub base_color: [f32; 3],
    /// Multiplier applied to the frame timestamp before it reaches `uTime`.
    pub speed: f32,
    /// Strength of each domain-warp octave.
    pub amplitude: f32,
    pub frequency_x: f32,
    pub frequency_y: f32,
    /// Mirror pointer and touch movement into `uMouse`.
    pub interactive: bool,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            base_color: [0.35, 0.25, 0.15],
            speed: 0.15,
            amplitude: 0.4,
            frequency_x: 2.5,
            frequency_y: 3.5,
            interactive: true,
        }
    }
}

impl BackgroundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, &value) in self.base_color.iter().enumerate() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::BaseColor { index, value });
            }
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ConfigError::Speed(self.speed));
        }
        if !(self.amplitude.is_finite() && self.amplitude >= 0.0) {
            return Err(ConfigError::Amplitude(self.amplitude));
        }
        if !self.frequency_x.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "frequency_x",
            });
        }
        if !self.frequency_y.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "frequency_y",
            });
        }
        Ok(())
    }
}

/// Decorative layer drawn above the background: logo, wave caption, subtitle.
///
/// Sizes are logical pixels; they are multiplied by the window scale factor
/// when rasterizing and laying out.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub logo: Option<PathBuf>,
    /// Edge of the square box the logo is fitted into.
    pub logo_size: f32,
    /// Centre of the logo box as a fraction of the window.
    pub logo_anchor: [f32; 2],
    pub caption: String,
    pub caption_color: [f32; 4],
    pub caption_size: f32,
    /// Solid stacked shadow under each caption letter, drawn `shadow_depth`
    /// logical pixels deep.
    pub caption_shadow: Option<[f32; 4]>,
    pub shadow_depth: f32,
    /// Extra horizontal space between caption letters.
    pub letter_gap: f32,
    /// Stagger between consecutive caption letters.
    pub letter_delay: Duration,
    pub wave: WaveConfig,
    pub subtitle: Option<String>,
    pub subtitle_color: [f32; 4],
    pub subtitle_size: f32,
    pub subtitle_line_height: f32,
    pub subtitle_max_width: f32,
    pub subtitle_fade: Duration,
    /// Centre of the caption/subtitle column as a fraction of the window.
    pub text_anchor: [f32; 2],
    /// Vertical space between the caption row and the subtitle block.
    pub text_spacing: f32,
    pub font: Option<PathBuf>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            logo: None,
            logo_size: 300.0,
            logo_anchor: [0.5, 0.3],
            caption: "COMING SOON".to_string(),
            caption_color: [212.0 / 255.0, 176.0 / 255.0, 150.0 / 255.0, 1.0],
            caption_size: 56.0,
            caption_shadow: Some([139.0 / 255.0, 69.0 / 255.0, 19.0 / 255.0, 1.0]),
            shadow_depth: 5.0,
            letter_gap: 12.8,
            letter_delay: Duration::from_millis(100),
            wave: WaveConfig::default(),
            subtitle: None,
            subtitle_color: [0.0, 0.0, 0.0, 1.0],
            subtitle_size: 25.6,
            subtitle_line_height: 1.7,
            subtitle_max_width: 650.0,
            subtitle_fade: Duration::from_secs(3),
            text_anchor: [0.5, 0.65],
            text_spacing: 32.0,
            font: None,
        }
    }
}

/// Infinite vertical bob applied to each caption letter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveConfig {
    pub period: Duration,
    /// Peak upward displacement in logical pixels.
    pub lift: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(2),
            lift: 20.0,
        }
    }
}

/// Anti-aliasing policy for the render pipeline.
///
/// The fragment shader already supersamples 3×3; MSAA only smooths the
/// overlay quad edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    pub title: String,
    pub fullscreen: bool,
    pub background: BackgroundConfig,
    pub overlay: OverlayConfig,
    /// Container colour beneath the shader; `None` clears to transparent.
    pub backdrop: Option<[f32; 4]>,
    pub antialiasing: Antialiasing,
    /// Render every frame at this timestamp instead of the wall clock.
    pub frozen_time: Option<Duration>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            title: "Coming Soon".to_string(),
            fullscreen: false,
            background: BackgroundConfig::default(),
            overlay: OverlayConfig::default(),
            backdrop: Some([44.0 / 255.0, 24.0 / 255.0, 16.0 / 255.0, 1.0]),
            antialiasing: Antialiasing::default(),
            frozen_time: None,
        }
    }
}

/// Container rectangle in logical pixels, in the same space as pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_background_is_valid() {
        assert!(BackgroundConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let mut config = BackgroundConfig {
            base_color: [0.2, 1.5, 0.3],
            ..BackgroundConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BaseColor {
                index: 1,
                value: 1.5
            })
        );

        config.base_color = [0.2, 0.2, 0.3];
        config.speed = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::Speed(0.0)));

        config.speed = 1.0;
        config.amplitude = -0.5;
        assert_eq!(config.validate(), Err(ConfigError::Amplitude(-0.5)));

        config.amplitude = 0.0;
        config.frequency_y = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite {
                name: "frequency_y"
            })
        ));
    }

    #[test]
    fn zero_area_bounds_are_empty() {
        assert!(Bounds::new(0.0, 0.0, 0.0, 100.0).is_empty());
        assert!(Bounds::new(0.0, 0.0, 100.0, 0.0).is_empty());
        assert!(!Bounds::new(10.0, 10.0, 1.0, 1.0).is_empty());
    }
}
