use std::time::Duration;

use pageconfig::{AntialiasSetting, PageConfig};
use renderer::{Antialiasing, BackgroundConfig, OverlayConfig, RendererConfig, WaveConfig};

use crate::cli::RunArgs;

/// Folds command-line overrides into the page file values.
pub fn apply_overrides(page: &mut PageConfig, args: &RunArgs) {
    let background = &mut page.background;
    if let Some(color) = args.base_color {
        background.base_color = color;
    }
    if let Some(speed) = args.speed {
        background.speed = speed;
    }
    if let Some(amplitude) = args.amplitude {
        background.amplitude = amplitude;
    }
    if let Some(frequency) = args.frequency_x {
        background.frequency_x = frequency;
    }
    if let Some(frequency) = args.frequency_y {
        background.frequency_y = frequency;
    }
    if args.no_interactive {
        background.interactive = false;
    }

    if let Some(logo) = args.logo.clone() {
        page.overlay.logo = Some(logo);
    }
    if let Some(font) = args.font.clone() {
        page.overlay.font = Some(font);
    }

    if let Some(size) = args.size {
        page.window.size = size;
    }
    if args.fullscreen {
        page.window.fullscreen = true;
    }
    if let Some(antialias) = args.antialias {
        page.window.antialias = antialias;
    }
}

pub fn renderer_config(page: &PageConfig, frozen_time: Option<Duration>) -> RendererConfig {
    let background = &page.background;
    let overlay = &page.overlay;
    let defaults = OverlayConfig::default();

    RendererConfig {
        surface_size: (page.window.size.width, page.window.size.height),
        title: page.window.title.clone(),
        fullscreen: page.window.fullscreen,
        background: BackgroundConfig {
            base_color: background.base_color,
            speed: background.speed,
            amplitude: background.amplitude,
            frequency_x: background.frequency_x,
            frequency_y: background.frequency_y,
            interactive: background.interactive,
        },
        overlay: OverlayConfig {
            logo: overlay.logo.clone(),
            logo_size: overlay.logo_size,
            caption: overlay.caption.clone(),
            caption_color: overlay.caption_color.rgba(),
            caption_size: overlay.caption_size,
            letter_gap: overlay.letter_gap,
            letter_delay: overlay.letter_delay,
            wave: WaveConfig {
                period: overlay.wave_period,
                lift: overlay.wave_lift,
            },
            subtitle: overlay.subtitle.clone(),
            subtitle_color: overlay.subtitle_color.rgba(),
            subtitle_size: overlay.subtitle_size,
            subtitle_max_width: overlay.subtitle_max_width,
            subtitle_fade: overlay.subtitle_fade,
            font: overlay.font.clone(),
            ..defaults
        },
        backdrop: page.style.background.map(|color| color.rgba()),
        antialiasing: map_antialias(page.window.antialias),
        frozen_time,
    }
}

pub fn map_antialias(setting: AntialiasSetting) -> Antialiasing {
    match setting {
        AntialiasSetting::Auto => Antialiasing::Auto,
        AntialiasSetting::Off => Antialiasing::Off,
        other => match other.samples() {
            Some(samples) if samples > 1 => Antialiasing::Samples(samples),
            _ => Antialiasing::Off,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pageconfig::SurfaceSize;

    use super::*;

    #[test]
    fn defaults_map_onto_renderer_defaults() {
        let config = renderer_config(&PageConfig::default(), None);
        assert_eq!(config.background, BackgroundConfig::default());
        assert_eq!(config.surface_size, (1280, 720));
        assert_eq!(config.antialiasing, Antialiasing::Auto);
        let backdrop = config.backdrop.unwrap();
        assert!((backdrop[0] - 44.0 / 255.0).abs() < 1e-6);
        assert_eq!(config.overlay.caption, "COMING SOON");
        assert_eq!(config.overlay.wave, WaveConfig::default());
        assert!(config.frozen_time.is_none());
    }

    #[test]
    fn cli_flags_override_file_values() {
        let mut page = PageConfig::from_toml_str(
            "[background]\nspeed = 0.5\ninteractive = true\n[window]\nsize = \"640x480\"\n",
        )
        .unwrap();
        let args = RunArgs {
            speed: Some(0.25),
            amplitude: Some(0.0),
            no_interactive: true,
            logo: Some(PathBuf::from("/tmp/logo.png")),
            size: Some(SurfaceSize {
                width: 320,
                height: 200,
            }),
            antialias: Some(AntialiasSetting::Samples4),
            ..RunArgs::default()
        };
        apply_overrides(&mut page, &args);

        let config = renderer_config(&page, Some(Duration::from_secs(3)));
        assert_eq!(config.background.speed, 0.25);
        assert_eq!(config.background.amplitude, 0.0);
        assert!(!config.background.interactive);
        assert_eq!(config.overlay.logo, Some(PathBuf::from("/tmp/logo.png")));
        assert_eq!(config.surface_size, (320, 200));
        assert_eq!(config.antialiasing, Antialiasing::Samples(4));
        assert_eq!(config.frozen_time, Some(Duration::from_secs(3)));
    }

    #[test]
    fn unset_flags_keep_file_values() {
        let mut page = PageConfig::from_toml_str("[background]\nfrequency_x = 4.0\n").unwrap();
        apply_overrides(&mut page, &RunArgs::default());
        assert_eq!(page.background.frequency_x, 4.0);
        assert!(page.background.interactive);
    }

    #[test]
    fn transparent_style_clears_backdrop() {
        let page = PageConfig::from_toml_str("[style]\nbackground = \"transparent\"\n").unwrap();
        assert!(renderer_config(&page, None).backdrop.is_none());
    }
}
