//! Entry point wiring the CLI surface, tracing and config discovery before
//! delegating to `run.rs`, plus the `config` and `build` utility commands.

mod bindings;
mod bundle;
mod cli;
mod paths;
mod run;

use std::process::ExitCode;

use anyhow::{Context, Result};
use cli::{Command, ConfigAction};
use paths::{AppPaths, ConfigSource};

fn main() -> Result<ExitCode> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Config(config_cmd)) => {
            handle_config_command(config_cmd.action, cli.run.config.as_deref())
        }
        Some(Command::Build) => Ok(bundle::run_release_build()),
        None => run::run(cli.run).map(|()| ExitCode::SUCCESS),
    }
}

fn handle_config_command(
    action: ConfigAction,
    global: Option<&std::path::Path>,
) -> Result<ExitCode> {
    let paths = AppPaths::discover()?;

    match action {
        ConfigAction::Where => {
            run_config_where(&paths);
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Check { path } => {
            let source = ConfigSource::resolve(path.as_deref().or(global), &paths);
            Ok(run_config_check(&source))
        }
        ConfigAction::Print { path } => {
            let source = ConfigSource::resolve(path.as_deref().or(global), &paths);
            run_config_print(&source)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_config_where(paths: &AppPaths) {
    println!("Configuration directories:");
    println!("  config:     {}", paths.config_dir().display());
    println!("  data:       {}", paths.data_dir().display());
    println!("  page file:  {}", paths.default_page_file().display());
}

fn run_config_check(source: &ConfigSource) -> ExitCode {
    let label = source
        .path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    match run::load_page(source) {
        Ok(_) => {
            println!("{label}: ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{label}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_config_print(source: &ConfigSource) -> Result<()> {
    let page = run::load_page(source)?;
    let rendered = page
        .to_toml_string()
        .context("failed to serialise page config")?;
    print!("{rendered}");
    Ok(())
}
