//! TOML configuration for the coming-soon page.
//!
//! A page file has four optional tables (`[background]`, `[overlay]`,
//! `[style]`, `[window]`). Every key has a default, so an empty file (or no
//! file at all) describes the stock page. Values are validated once after
//! parsing; the renderer never sees out-of-range parameters.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Largest caption or subtitle size, in logical pixels.
pub const MAX_TEXT_SIZE: f32 = 256.0;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub background: BackgroundSection,
    pub overlay: OverlaySection,
    pub style: StyleSection,
    pub window: WindowSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundSection {
    pub base_color: [f32; 3],
    pub speed: f32,
    pub amplitude: f32,
    pub frequency_x: f32,
    pub frequency_y: f32,
    pub interactive: bool,
}

impl Default for BackgroundSection {
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

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlaySection {
    /// Logo image; relative paths resolve against the config file directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
    pub logo_size: f32,
    pub caption: String,
    pub caption_color: HexColor,
    pub caption_size: f32,
    pub letter_gap: f32,
    #[serde(with = "duration")]
    pub letter_delay: Duration,
    #[serde(with = "duration")]
    pub wave_period: Duration,
    pub wave_lift: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub subtitle_color: HexColor,
    pub subtitle_size: f32,
    pub subtitle_max_width: f32,
    #[serde(with = "duration")]
    pub subtitle_fade: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

impl Default for OverlaySection {
    fn default() -> Self {
        Self {
            logo: None,
            logo_size: 300.0,
            caption: "COMING SOON".to_string(),
            caption_color: HexColor::rgb(0xd4, 0xb0, 0x96),
            caption_size: 56.0,
            letter_gap: 12.8,
            letter_delay: Duration::from_millis(100),
            wave_period: Duration::from_secs(2),
            wave_lift: 20.0,
            subtitle: Some(
                "Brewing something special. The aroma of excellence is in the air.".to_string(),
            ),
            subtitle_color: HexColor::rgb(0, 0, 0),
            subtitle_size: 25.6,
            subtitle_max_width: 650.0,
            subtitle_fade: Duration::from_secs(3),
            font: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSection {
    /// Container colour painted beneath the shader. `None`, written as
    /// `"transparent"`, keeps the window see-through.
    #[serde(with = "backdrop")]
    pub background: Option<HexColor>,
}

impl Default for StyleSection {
    fn default() -> Self {
        Self {
            background: Some(HexColor::rgb(0x2c, 0x18, 0x10)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSection {
    pub size: SurfaceSize,
    pub fullscreen: bool,
    pub antialias: AntialiasSetting,
    pub title: String,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            size: SurfaceSize {
                width: 1280,
                height: 720,
            },
            fullscreen: false,
            antialias: AntialiasSetting::Auto,
            title: "Coming Soon".to_string(),
        }
    }
}

/// RGBA colour with components in `[0, 1]`, written as `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexColor(pub [f32; 4]);

impl HexColor {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| format!("colour '{trimmed}' must start with '#'"))?;
        if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return Err(format!("colour '{trimmed}' contains non-hex digits"));
        }

        let channel = |hex: &str| u8::from_str_radix(hex, 16).map(|v| v as f32 / 255.0);
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
            6 | 8 => digits.to_string(),
            _ => {
                return Err(format!(
                    "colour '{trimmed}' must have 3, 6, or 8 hex digits"
                ))
            }
        };

        let mut rgba = [1.0; 4];
        for (index, slot) in rgba.iter_mut().enumerate().take(expanded.len() / 2) {
            let start = index * 2;
            *slot = channel(&expanded[start..start + 2]).map_err(|err| err.to_string())?;
        }
        Ok(Self(rgba))
    }

    pub fn rgba(&self) -> [f32; 4] {
        self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        HexColor::parse(&raw).map_err(de::Error::custom)
    }
}

/// Window size in physical pixels, written as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn parse(spec: &str) -> Result<Self, String> {
        let trimmed = spec.trim();
        let (width, height) = trimmed
            .split_once(['x', 'X', '×'])
            .ok_or_else(|| "expected WxH format, e.g. 1920x1080".to_string())?;

        let width: u32 = width
            .trim()
            .parse()
            .map_err(|_| "invalid width in size specification".to_string())?;
        let height: u32 = height
            .trim()
            .parse()
            .map_err(|_| "invalid height in size specification".to_string())?;

        if width == 0 || height == 0 {
            return Err("surface dimensions must be greater than zero".to_string());
        }

        Ok(Self { width, height })
    }
}

impl fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Serialize for SurfaceSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SurfaceSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SurfaceSize::parse(&raw).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntialiasSetting {
    Auto,
    Off,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

impl AntialiasSetting {
    pub fn from_samples(samples: u32) -> Option<Self> {
        match samples {
            0 | 1 => Some(Self::Off),
            2 => Some(Self::Samples2),
            4 => Some(Self::Samples4),
            8 => Some(Self::Samples8),
            16 => Some(Self::Samples16),
            _ => None,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "auto" | "max" | "default" => Ok(Self::Auto),
            "off" | "none" | "disable" | "disabled" => Ok(Self::Off),
            other => other
                .parse::<u32>()
                .ok()
                .and_then(Self::from_samples)
                .ok_or_else(|| {
                    format!("invalid antialias setting '{other}'; use auto/off or 2/4/8/16")
                }),
        }
    }

    /// Explicit MSAA sample count, or `None` for `Auto`.
    pub fn samples(self) -> Option<u32> {
        match self {
            Self::Auto => None,
            Self::Off => Some(1),
            Self::Samples2 => Some(2),
            Self::Samples4 => Some(4),
            Self::Samples8 => Some(8),
            Self::Samples16 => Some(16),
        }
    }
}

impl fmt::Display for AntialiasSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Off => f.write_str("off"),
            other => write!(f, "{}", other.samples().unwrap_or(1)),
        }
    }
}

impl Serialize for AntialiasSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AntialiasSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Str(String),
            Num(i64),
        }

        match Helper::deserialize(deserializer)? {
            Helper::Str(raw) => AntialiasSetting::parse(&raw).map_err(de::Error::custom),
            Helper::Num(value) => {
                if value < 0 {
                    return Err(de::Error::custom("antialias value must be non-negative"));
                }
                AntialiasSetting::parse(&value.to_string()).map_err(de::Error::custom)
            }
        }
    }
}

/// Optional colour where `"transparent"` (or `"none"`) means no colour.
mod backdrop {
    use super::*;

    const TRANSPARENT: &str = "transparent";

    pub fn serialize<S: Serializer>(
        value: &Option<HexColor>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(color) => color.serialize(serializer),
            None => serializer.serialize_str(TRANSPARENT),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<HexColor>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(TRANSPARENT) || trimmed.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        HexColor::parse(trimmed).map(Some).map_err(de::Error::custom)
    }
}

/// Durations accept humantime strings (`"150ms"`, `"2s"`) or plain seconds.
mod duration {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;
        impl<'de> de::Visitor<'de> for Visitor {
            type Value = Duration;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a duration as number of seconds or human-readable string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                humantime::parse_duration(v)
                    .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Duration::from_secs(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v < 0 {
                    return Err(E::custom("duration must be non-negative"));
                }
                Ok(Duration::from_secs(v as u64))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if !v.is_finite() || v.is_sign_negative() {
                    return Err(E::custom("duration must be non-negative"));
                }
                Ok(Duration::from_secs_f64(v))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

impl PageConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: PageConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    /// Reads and validates a page file, resolving relative asset paths
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(dir) = path.parent() {
            config.resolve_relative_paths(dir);
        }
        Ok(config)
    }

    pub fn resolve_relative_paths(&mut self, base: &Path) {
        for slot in [&mut self.overlay.logo, &mut self.overlay.font] {
            if let Some(path) = slot.as_mut() {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let background = &self.background;
        for (index, component) in background.base_color.iter().enumerate() {
            if !component.is_finite() || !(0.0..=1.0).contains(component) {
                return Err(ConfigError::Invalid(format!(
                    "background.base_color[{index}] must be within [0, 1], got {component}"
                )));
            }
        }

        if !background.speed.is_finite() || background.speed <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "background.speed must be greater than zero, got {}",
                background.speed
            )));
        }

        if !background.amplitude.is_finite() || background.amplitude < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "background.amplitude must be >= 0, got {}",
                background.amplitude
            )));
        }

        for (name, value) in [
            ("frequency_x", background.frequency_x),
            ("frequency_y", background.frequency_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "background.{name} must be a finite number"
                )));
            }
        }

        let overlay = &self.overlay;
        for (name, value) in [
            ("logo_size", overlay.logo_size),
            ("caption_size", overlay.caption_size),
            ("subtitle_size", overlay.subtitle_size),
            ("subtitle_max_width", overlay.subtitle_max_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "overlay.{name} must be greater than zero"
                )));
            }
        }

        for (name, value) in [
            ("caption_size", overlay.caption_size),
            ("subtitle_size", overlay.subtitle_size),
        ] {
            if value > MAX_TEXT_SIZE {
                return Err(ConfigError::Invalid(format!(
                    "overlay.{name} must be at most {MAX_TEXT_SIZE}, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("letter_gap", overlay.letter_gap),
            ("wave_lift", overlay.wave_lift),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "overlay.{name} must be >= 0"
                )));
            }
        }

        if overlay.wave_period.is_zero() {
            return Err(ConfigError::Invalid(
                "overlay.wave_period must be greater than zero".into(),
            ));
        }

        if self.window.title.trim().is_empty() {
            return Err(ConfigError::Invalid("window.title may not be empty".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
[background]
base_color = [0.2, 0.2, 0.3]
speed = 0.15
amplitude = 0.4
frequency_x = 2.5
frequency_y = 3.5

[overlay]
logo = "Sideeye-logo-nobg.png"
letter_delay = "150ms"
wave_period = 3
subtitle_fade = 1.5

[style]
background = "#0a0a0a"

[window]
size = "1920x1080"
antialias = 4
"##;

    #[test]
    fn parses_sample_config() {
        let config = PageConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.background.base_color, [0.2, 0.2, 0.3]);
        assert!(config.background.interactive);
        assert_eq!(
            config.overlay.logo.as_deref(),
            Some(Path::new("Sideeye-logo-nobg.png"))
        );
        assert_eq!(config.overlay.letter_delay, Duration::from_millis(150));
        assert_eq!(config.overlay.wave_period, Duration::from_secs(3));
        assert_eq!(config.overlay.subtitle_fade, Duration::from_millis(1500));
        assert_eq!(config.style.background, Some(HexColor::rgb(10, 10, 10)));
        assert_eq!(
            config.window.size,
            SurfaceSize {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(config.window.antialias, AntialiasSetting::Samples4);
    }

    #[test]
    fn empty_file_uses_component_defaults() {
        let config = PageConfig::from_toml_str("").expect("parse empty config");
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.background.speed, 0.15);
        assert_eq!(config.overlay.caption, "COMING SOON");
        assert_eq!(
            config.style.background.map(|c| c.to_string()).as_deref(),
            Some("#2c1810")
        );
    }

    #[test]
    fn rejects_out_of_range_color() {
        let err = PageConfig::from_toml_str("[background]\nbase_color = [1.2, 0.0, 0.0]\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_speed() {
        for speed in ["0.0", "-1.0"] {
            let err = PageConfig::from_toml_str(&format!("[background]\nspeed = {speed}\n"))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "speed {speed}");
        }
    }

    #[test]
    fn rejects_negative_amplitude() {
        let err = PageConfig::from_toml_str("[background]\namplitude = -0.1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = PageConfig::from_toml_str("[background]\nsped = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_oversized_text() {
        let err = PageConfig::from_toml_str("[overlay]\ncaption_size = 1000.0\n").unwrap_err();
        assert!(format!("{err}").contains("caption_size"));
        assert!(PageConfig::from_toml_str("[overlay]\nsubtitle_size = 256.0\n").is_ok());
    }

    #[test]
    fn transparent_backdrop_round_trips() {
        for raw in ["transparent", "none", " Transparent "] {
            let config =
                PageConfig::from_toml_str(&format!("[style]\nbackground = \"{raw}\"\n")).unwrap();
            assert_eq!(config.style.background, None, "{raw}");
        }

        let mut config = PageConfig::default();
        config.style.background = None;
        let printed = config.to_toml_string().unwrap();
        assert!(printed.contains("background = \"transparent\""));
        let reparsed = PageConfig::from_toml_str(&printed).unwrap();
        assert_eq!(reparsed.style.background, None);

        assert!(PageConfig::from_toml_str("[style]\nbackground = \"clear\"\n").is_err());
    }

    #[test]
    fn hex_colors_accept_short_and_alpha_forms() {
        assert_eq!(HexColor::parse("#fff").unwrap(), HexColor([1.0; 4]));
        let translucent = HexColor::parse("#00000080").unwrap();
        assert!((translucent.0[3] - 128.0 / 255.0).abs() < 1e-6);
        assert!(HexColor::parse("2c1810").is_err());
        assert!(HexColor::parse("#2c18").is_err());
        assert!(HexColor::parse("#zzzzzz").is_err());
    }

    #[test]
    fn surface_size_rejects_zero_dimensions() {
        assert!(SurfaceSize::parse("0x720").is_err());
        assert!(SurfaceSize::parse("1280").is_err());
        assert_eq!(
            SurfaceSize::parse(" 800 x 600 ").unwrap(),
            SurfaceSize {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn relative_assets_resolve_against_config_dir() {
        let mut config = PageConfig::from_toml_str(SAMPLE).unwrap();
        config.overlay.font = Some(PathBuf::from("/usr/share/fonts/bold.ttf"));
        config.resolve_relative_paths(Path::new("/srv/page"));
        assert_eq!(
            config.overlay.logo.as_deref(),
            Some(Path::new("/srv/page/Sideeye-logo-nobg.png"))
        );
        assert_eq!(
            config.overlay.font.as_deref(),
            Some(Path::new("/usr/share/fonts/bold.ttf"))
        );
    }

    #[test]
    fn printed_config_parses_back() {
        let config = PageConfig::from_toml_str(SAMPLE).unwrap();
        let printed = config.to_toml_string().expect("serialize");
        let reparsed = PageConfig::from_toml_str(&printed).expect("reparse");
        assert_eq!(reparsed.overlay.letter_delay, config.overlay.letter_delay);
        assert_eq!(reparsed.window.antialias, config.window.antialias);
        assert_eq!(reparsed.style.background, config.style.background);
    }
}
