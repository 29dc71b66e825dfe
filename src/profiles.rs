//! Core profile management logic.
//!
//! This module handles the "data model" of profiles:
//! - Bootstrapping the store directory on first run
//! - Listing available profiles
//! - Validating profile names
//! - Creating, reading and writing profile files
//!
//! Every operation goes through a [`ProfileStore`] built once per invocation
//! from the resolved [`Paths`].

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::NpmrcError;
use crate::paths::Paths;
use crate::switch::LinkStatus;

/// Name of the profile seeded on first run
pub const DEFAULT_PROFILE: &str = "default";

/// Outcome of [`ProfileStore::ensure_store`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreInit {
    /// The store was already there
    Ready,
    /// The store was just created. `seeded` is true when an existing
    /// active config became the `default` profile.
    Bootstrapped { seeded: bool },
}

/// Handle over the profile directory and the active link
#[derive(Debug, Clone)]
pub struct ProfileStore {
    paths: Paths,
}

impl ProfileStore {
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Path of a profile file inside the store
    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.paths.profile_path(name)
    }

    /// Make sure the store directory exists, bootstrapping it if needed.
    ///
    /// On bootstrap an existing active config becomes the `default` profile,
    /// otherwise `default` is created empty. Activating it is left to the
    /// caller.
    pub fn ensure_store(&self) -> Result<StoreInit> {
        let store_dir = &self.paths.store_dir;

        match fs::metadata(store_dir) {
            Ok(meta) if meta.is_dir() => return Ok(StoreInit::Ready),
            Ok(_) => return Err(NpmrcError::NotADirectory(store_dir.clone()).into()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to inspect store directory: {}", store_dir.display())
                });
            }
        }

        let active = &self.paths.active_link;
        let status = LinkStatus::detect(active);
        if matches!(status, LinkStatus::Directory) {
            return Err(NpmrcError::NotASymlink {
                link: active.clone(),
                store: store_dir.clone(),
            }
            .into());
        }
        if matches!(status, LinkStatus::Symlink { .. }) && active.is_dir() {
            return Err(NpmrcError::LinkTargetNotAFile(active.clone()).into());
        }

        fs::create_dir_all(store_dir)
            .with_context(|| format!("Failed to create store directory: {}", store_dir.display()))?;
        debug!(store = %store_dir.display(), "created store");

        let default = self.profile_path(DEFAULT_PROFILE);
        let seeded = match status {
            LinkStatus::RegularFile => {
                move_file(active, &default)?;
                true
            }
            LinkStatus::Symlink { .. } => {
                let content = fs::read(active)
                    .with_context(|| format!("Failed to read {}", active.display()))?;
                fs::write(&default, content)
                    .with_context(|| format!("Failed to write {}", default.display()))?;
                fs::remove_file(active)
                    .with_context(|| format!("Failed to remove {}", active.display()))?;
                true
            }
            LinkStatus::Missing | LinkStatus::BrokenSymlink { .. } | LinkStatus::Directory => {
                fs::write(&default, "")
                    .with_context(|| format!("Failed to create {}", default.display()))?;
                false
            }
        };
        debug!(seeded, "seeded default profile");

        Ok(StoreInit::Bootstrapped { seeded })
    }

    /// Every entry name in the store, hidden ones included, in directory order
    pub fn entries(&self) -> Result<Vec<String>> {
        let store_dir = &self.paths.store_dir;
        let mut names = Vec::new();
        for entry in fs::read_dir(store_dir)
            .with_context(|| format!("Failed to read store directory: {}", store_dir.display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(entry = ?raw, "skipping store entry with a non UTF-8 name"),
            }
        }
        Ok(names)
    }

    /// Profile names shown to the user: directory order, dot-files excluded
    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .collect())
    }

    /// Check if a profile exists
    pub fn exists(&self, name: &str) -> bool {
        is_plain_name(name) && self.profile_path(name).exists()
    }

    /// Create a new, empty profile
    pub fn create(&self, name: &str) -> Result<PathBuf> {
        validate_profile_name(name)?;
        let path = self.profile_path(name);

        let already_exists = || NpmrcError::ProfileExists {
            name: name.to_string(),
            path: path.clone(),
        };
        if fs::symlink_metadata(&path).is_ok() {
            return Err(already_exists().into());
        }

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(already_exists().into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to create profile: {}", path.display()));
            }
        }
        debug!(profile = name, "created profile");

        Ok(path)
    }

    /// Read a profile's content
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.profile_path(name);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read profile: {}", path.display()))
    }

    /// Replace a profile's content
    pub fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.profile_path(name);
        fs::write(&path, content)
            .with_context(|| format!("Failed to write profile: {}", path.display()))
    }
}

/// A name that maps to a direct child of the store
pub(crate) fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains(std::path::MAIN_SEPARATOR)
}

/// Validate a name for a new profile.
///
/// Dot-prefixed names are rejected since listings hide them.
pub fn validate_profile_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name cannot be empty")
    } else if !is_plain_name(name) {
        Some("name cannot contain path separators")
    } else if name.starts_with('.') {
        Some("name cannot start with '.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(NpmrcError::InvalidProfileName {
            name: name.to_string(),
            reason,
        }
        .into()),
        None => Ok(()),
    }
}

/// Move a file, falling back to copy + remove across filesystems
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        debug!(from = %from.display(), to = %to.display(), "renamed");
        return Ok(());
    }

    fs::copy(from, to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    fs::remove_file(from).with_context(|| format!("Failed to remove {}", from.display()))?;
    debug!(from = %from.display(), to = %to.display(), "copied and removed");
    Ok(())
}
