//! Profile switching logic.
//!
//! This module implements the core mechanism of `npmrc`: repointing the
//! active link at a profile. It handles:
//! - Refusing to replace an active config that is not a symlink.
//! - Short-circuiting when the requested profile is already active.
//! - Removing the old link and creating the new one.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::NpmrcError;
use crate::profiles::ProfileStore;

/// What currently sits at the active link path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Missing,
    RegularFile,
    Directory,
    Symlink { target: PathBuf },
    BrokenSymlink { target: PathBuf },
}

impl LinkStatus {
    pub fn detect(path: &Path) -> Self {
        // symlink_metadata does not follow the link
        let Ok(meta) = fs::symlink_metadata(path) else {
            return Self::Missing;
        };

        if meta.file_type().is_symlink() {
            let target = read_target(path);
            if path.exists() {
                Self::Symlink { target }
            } else {
                Self::BrokenSymlink { target }
            }
        } else if meta.is_dir() {
            Self::Directory
        } else {
            Self::RegularFile
        }
    }

    /// Link target, for either kind of symlink
    pub fn target(&self) -> Option<&Path> {
        match self {
            Self::Symlink { target } | Self::BrokenSymlink { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_link(&self) -> bool {
        self.target().is_some()
    }
}

/// Target of a symlink; an unreadable link yields an empty path
fn read_target(path: &Path) -> PathBuf {
    fs::read_link(path).unwrap_or_else(|e| {
        debug!(link = %path.display(), error = %e, "could not read link target");
        PathBuf::new()
    })
}

/// Result of [`activate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The link already pointed at the profile; nothing was touched
    AlreadyActive { name: String, path: PathBuf },
    /// The link was replaced. `previous` is the basename of the old target.
    Switched {
        previous: Option<String>,
        name: String,
        path: PathBuf,
    },
}

/// Refuse to go on when the active config is a real file or directory
pub fn ensure_link_replaceable(store: &ProfileStore) -> Result<LinkStatus> {
    let paths = store.paths();
    let status = LinkStatus::detect(&paths.active_link);
    match status {
        LinkStatus::RegularFile | LinkStatus::Directory => Err(NpmrcError::NotASymlink {
            link: paths.active_link.clone(),
            store: paths.store_dir.clone(),
        }
        .into()),
        _ => Ok(status),
    }
}

/// Point the active link at profile `name`
pub fn activate(store: &ProfileStore, name: &str) -> Result<Activation> {
    if !store.exists(name) {
        return Err(NpmrcError::ProfileNotFound(name.to_string()).into());
    }
    let target = store.profile_path(name);

    let status = ensure_link_replaceable(store)?;
    let link = &store.paths().active_link;

    if status.target() == Some(target.as_path()) {
        return Ok(Activation::AlreadyActive {
            name: name.to_string(),
            path: target,
        });
    }

    let previous = status.target().and_then(basename);
    if status.is_link() {
        fs::remove_file(link)
            .with_context(|| format!("Failed to remove old link: {}", link.display()))?;
        debug!(link = %link.display(), "removed old link");
    }

    make_symlink(&target, link)?;
    debug!(link = %link.display(), target = %target.display(), "linked");

    Ok(Activation::Switched {
        previous,
        name: name.to_string(),
        path: target,
    })
}

/// Basename of the profile the active link points at, if any
pub fn active_profile_name(store: &ProfileStore) -> Option<String> {
    LinkStatus::detect(&store.paths().active_link)
        .target()
        .and_then(basename)
}

fn basename(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

fn make_symlink(target: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link).with_context(|| {
        format!(
            "Failed to create symlink from {} to {}",
            link.display(),
            target.display()
        )
    })?;

    #[cfg(windows)]
    std::os::windows::fs::symlink_file(target, link).with_context(|| {
        format!(
            "Failed to create symlink from {} to {}",
            link.display(),
            target.display()
        )
    })?;

    Ok(())
}
