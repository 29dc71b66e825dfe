//! Domain errors.
//!
//! Everything else travels as `anyhow::Error`; these variants exist so the
//! binary and the tests can tell the failure classes apart.

use std::path::PathBuf;
use thiserror::Error;

/// One-line usage string shown with every usage error
pub const USAGE: &str = "Usage: npmrc [-c] [-r] [name]";

#[derive(Debug, Error)]
pub enum NpmrcError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Couldn't find npmrc file \"{0}\".")]
    ProfileNotFound(String),

    #[error("npmrc file \"{name}\", already exists ({})", .path.display())]
    ProfileExists { name: String, path: PathBuf },

    #[error("Invalid npmrc name \"{name}\": {reason}")]
    InvalidProfileName { name: String, reason: &'static str },

    #[error(
        "Current .npmrc ({}) is not a symlink. You may want to copy it into {}.",
        .link.display(),
        .store.display()
    )]
    NotASymlink { link: PathBuf, store: PathBuf },

    #[error("Current .npmrc ({}) points at a directory, not a file", .0.display())]
    LinkTargetNotAFile(PathBuf),

    #[error("\"{0}\" is not a valid registry name")]
    UnknownRegistry(String),

    #[error("No active .npmrc found at {}", .0.display())]
    NoActiveProfile(PathBuf),

    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
}
