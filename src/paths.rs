use anyhow::{Context, Result};
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the profile store directory
pub const STORE_ENV: &str = "NPMRC_STORE";
/// Environment variable overriding the active config path
pub const LINK_ENV: &str = "NPMRC";

/// All computed paths used by npmrc
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~/.npmrcs
    pub store_dir: PathBuf,
    /// ~/.npmrc
    pub active_link: PathBuf,
}

impl Paths {
    /// Resolve paths from `NPMRC_STORE` / `NPMRC`, falling back to the home directory
    pub fn new() -> Result<Self> {
        Self::resolve(
            env_path(STORE_ENV),
            env_path(LINK_ENV),
            || BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
        )
    }

    /// Build paths from explicit overrides. `home` is only consulted when an
    /// override is missing.
    pub fn resolve<F>(
        store_override: Option<PathBuf>,
        link_override: Option<PathBuf>,
        home: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> Option<PathBuf>,
    {
        let home_dir = match (&store_override, &link_override) {
            (Some(_), Some(_)) => PathBuf::new(),
            _ => home().context("Failed to determine home directory")?,
        };

        let store_dir = store_override.unwrap_or_else(|| home_dir.join(".npmrcs"));
        let active_link = link_override.unwrap_or_else(|| home_dir.join(".npmrc"));

        Ok(Self {
            store_dir: absolute(&store_dir)?,
            active_link: absolute(&active_link)?,
        })
    }

    /// Get the path to a specific profile file
    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.store_dir.join(name)
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve absolute path for {}", path.display()))
}
