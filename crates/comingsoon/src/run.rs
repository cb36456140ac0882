//! Default launch path: resolve the page file, fold in CLI overrides and hand
//! the result to the renderer.

use anyhow::{Context, Result};
use pageconfig::PageConfig;
use renderer::Renderer;
use tracing_subscriber::EnvFilter;

use crate::bindings::{apply_overrides, renderer_config};
use crate::cli::RunArgs;
use crate::paths::{AppPaths, ConfigSource};

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let source = ConfigSource::resolve(args.config.as_deref(), &paths);
    tracing::debug!(
        config_dir = %paths.config_dir().display(),
        data_dir = %paths.data_dir().display(),
        ?source,
        "resolved comingsoon paths"
    );

    let mut page = load_page(&source)?;
    apply_overrides(&mut page, &args);
    page.validate().context("command-line overrides produced an invalid configuration")?;

    let config = renderer_config(&page, args.freeze_time);
    tracing::info!(
        size = %page.window.size,
        fullscreen = config.fullscreen,
        interactive = config.background.interactive,
        logo = config.overlay.logo.is_some(),
        "launching coming-soon window"
    );

    Renderer::new(config).run()
}

/// Loads the page file named by `source`, or the built-in defaults.
pub fn load_page(source: &ConfigSource) -> Result<PageConfig> {
    match source.path() {
        Some(path) => PageConfig::load(path)
            .with_context(|| format!("failed to load page config {}", path.display())),
        None => {
            tracing::debug!("no page config found; using built-in defaults");
            Ok(PageConfig::default())
        }
    }
}

pub fn initialise_tracing() {
    let default_filter = "warn,comingsoon=info,renderer=info,pageconfig=info,naga=error,wgpu=error,wgpu_core=error,wgpu_hal=error,winit=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_source_yields_stock_page() {
        let page = load_page(&ConfigSource::Defaults).unwrap();
        assert_eq!(page, PageConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let root = TempDir::new().unwrap();
        let source = ConfigSource::Explicit(root.path().join("absent.toml"));
        let err = load_page(&source).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }

    #[test]
    fn relative_logo_resolves_against_page_file() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("page.toml");
        fs::write(&file, "[overlay]\nlogo = \"logo.png\"\n").unwrap();
        let page = load_page(&ConfigSource::Discovered(file)).unwrap();
        assert_eq!(page.overlay.logo, Some(root.path().join("logo.png")));
    }
}
