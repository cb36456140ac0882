//! `comingsoon build`: release build wrapper.

use std::process::{Command, ExitCode, Stdio};

use anyhow::{bail, Context, Result};

const BUILD_PROGRAM: &str = "cargo";
const BUILD_ARGS: &[&str] = &["build", "--release", "--package", "comingsoon"];

/// Runs the release build, reporting progress on stdout.
pub fn run_release_build() -> ExitCode {
    println!("Building release bundle...");
    match run_build_command(BUILD_PROGRAM, BUILD_ARGS) {
        Ok(()) => {
            println!("Build completed successfully!");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Build failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Spawns `program` with inherited stdio and waits for it.
pub fn run_build_command(program: &str, args: &[&str]) -> Result<()> {
    tracing::debug!(program, ?args, "spawning build command");
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to spawn `{program}`"))?;

    if !status.success() {
        bail!("`{program} {}` exited with {status}", args.join(" "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn successful_command_is_ok() {
        run_build_command("true", &[]).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_reported() {
        let err = run_build_command("false", &[]).unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = run_build_command("comingsoon-no-such-build-tool", &["--release"]).unwrap_err();
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[test]
    fn build_targets_this_package_in_release() {
        assert_eq!(BUILD_PROGRAM, "cargo");
        assert!(BUILD_ARGS.contains(&"--release"));
        assert_eq!(BUILD_ARGS.last(), Some(&"comingsoon"));
    }
}
