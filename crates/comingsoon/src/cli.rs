use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pageconfig::{AntialiasSetting, SurfaceSize};

#[derive(Parser, Debug)]
#[command(
    name = "comingsoon",
    author,
    version,
    about = "Animated coming-soon screen with a liquid shader background",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Page configuration file; defaults to `page.toml` in the config directory.
    #[arg(long, value_name = "PATH", env = "COMINGSOON_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = SurfaceSize::parse)]
    pub size: Option<SurfaceSize>,

    /// Open the window borderless fullscreen.
    #[arg(long)]
    pub fullscreen: bool,

    /// Tint mixed into the palette, as three components in [0, 1] (e.g. `0.2,0.2,0.3`).
    #[arg(long, value_name = "R,G,B", value_parser = parse_base_color)]
    pub base_color: Option<[f32; 3]>,

    /// Animation speed multiplier.
    #[arg(long, value_name = "SPEED")]
    pub speed: Option<f32>,

    /// Domain-warp strength.
    #[arg(long, value_name = "AMPLITUDE")]
    pub amplitude: Option<f32>,

    #[arg(long, value_name = "FREQUENCY", allow_negative_numbers = true)]
    pub frequency_x: Option<f32>,

    #[arg(long, value_name = "FREQUENCY", allow_negative_numbers = true)]
    pub frequency_y: Option<f32>,

    /// Ignore pointer and touch movement.
    #[arg(long)]
    pub no_interactive: bool,

    /// Logo image drawn above the caption.
    #[arg(long, value_name = "PATH")]
    pub logo: Option<PathBuf>,

    /// Font used for the caption and subtitle.
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = AntialiasSetting::parse)]
    pub antialias: Option<AntialiasSetting>,

    /// Render every frame at this timestamp (seconds) instead of the wall clock.
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub freeze_time: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect and validate page configuration.
    Config(ConfigCommand),
    /// Build the release binary.
    Build,
}

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print resolved config and data directories.
    Where,
    /// Validate a page file; exits non-zero when it is invalid.
    Check {
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML.
    Print {
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_base_color(value: &str) -> Result<[f32; 3], String> {
    let components = value
        .split(',')
        .map(|part| {
            let trimmed = part.trim();
            trimmed
                .parse::<f32>()
                .map_err(|_| format!("invalid colour component '{trimmed}'"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [r, g, b] = components[..] else {
        return Err(format!(
            "expected three comma-separated components, got {}",
            components.len()
        ));
    };
    for component in [r, g, b] {
        if !(0.0..=1.0).contains(&component) {
            return Err(format!("colour component {component} is outside [0, 1]"));
        }
    }
    Ok([r, g, b])
}

pub fn parse_seconds(value: &str) -> Result<Duration, String> {
    let trimmed = value.trim();
    let seconds: f64 = trimmed
        .parse()
        .map_err(|_| format!("invalid timestamp '{trimmed}'; expected seconds"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("timestamp must be a non-negative number, got {trimmed}"));
    }
    Ok(Duration::from_secs_f64(seconds))
}
