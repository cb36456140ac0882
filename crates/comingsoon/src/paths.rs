//! Resolves the config and data directories and the default page file.
//!
//! Environment overrides win over the platform defaults from
//! `directories-next`. Nothing is created on disk; a missing default page
//! file simply means the built-in defaults apply.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "COMINGSOON_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "COMINGSOON_DATA_DIR";

const QUALIFIER: &str = "coffee";
const ORGANISATION: &str = "sideeye";
const APPLICATION: &str = "comingsoon";
const PAGE_FILE: &str = "page.toml";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        let config_override = env_override(ENV_CONFIG_DIR);
        let data_override = env_override(ENV_DATA_DIR);
        if let (Some(config_dir), Some(data_dir)) = (&config_override, &data_override) {
            return Ok(Self::new(config_dir.clone(), data_dir.clone()));
        }

        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or_else(|| anyhow!("failed to determine user directories"))?;
        Ok(Self::new(
            config_override.unwrap_or_else(|| project_dirs.config_dir().to_path_buf()),
            data_override.unwrap_or_else(|| project_dirs.data_dir().to_path_buf()),
        ))
    }

    pub fn new(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_dir,
            data_dir,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn default_page_file(&self) -> PathBuf {
        self.config_dir.join(PAGE_FILE)
    }
}

/// Where the effective page configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line or through `COMINGSOON_CONFIG`; must exist.
    Explicit(PathBuf),
    /// The default page file, which exists.
    Discovered(PathBuf),
    /// No file; built-in defaults.
    Defaults,
}

impl ConfigSource {
    pub fn resolve(explicit: Option<&Path>, paths: &AppPaths) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path.to_path_buf());
        }
        let candidate = paths.default_page_file();
        if candidate.is_file() {
            Self::Discovered(candidate)
        } else {
            Self::Defaults
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Discovered(path) => Some(path),
            Self::Defaults => None,
        }
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
