//! Rewriting the `registry` directive of the active profile.
//!
//! Content is split on `\n`; a trailing `\r` on a line is kept as part of
//! that line's terminator, so CRLF files stay CRLF.

use anyhow::{Context, Result};
use std::fs;
use tracing::debug;

use crate::error::NpmrcError;
use crate::profiles::ProfileStore;
use crate::switch::ensure_link_replaceable;

/// Known registry mirrors, by alias
pub const REGISTRIES: &[(&str, &str)] = &[
    ("au", "http://registry.npmjs.org.au/"),
    ("eu", "http://registry.npmjs.eu/"),
    ("cn", "http://r.cnpmjs.org/"),
    ("default", "https://registry.npmjs.org/"),
];

const KEY: &str = "registry";

/// Look up a registry alias
pub fn registry_url(alias: &str) -> Option<&'static str> {
    REGISTRIES
        .iter()
        .find(|(name, _)| *name == alias)
        .map(|(_, url)| *url)
}

/// Replace the first line mentioning `registry`, or prepend one
pub fn rewrite_registry(content: &str, url: &str) -> String {
    let directive = format!("{KEY} = {url}");
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

    match lines.iter().position(|line| line.contains(KEY)) {
        Some(idx) => {
            let cr = if lines[idx].ends_with('\r') { "\r" } else { "" };
            lines[idx] = format!("{directive}{cr}");
        }
        None => {
            let cr = if lines.len() > 1 && lines[0].ends_with('\r') {
                "\r"
            } else {
                ""
            };
            lines.insert(0, format!("{directive}{cr}"));
        }
    }

    lines.join("\n")
}

/// Value of the first `registry` directive, if any
pub fn current_registry(content: &str) -> Option<&str> {
    content
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .find(|line| line.contains(KEY))
        .and_then(|line| line.split_once('='))
        .map(|(_, value)| value.trim())
}

/// Point the active profile at the registry named by `alias`.
///
/// Returns the URL written.
pub fn set_registry(store: &ProfileStore, alias: &str) -> Result<&'static str> {
    let url = registry_url(alias).ok_or_else(|| NpmrcError::UnknownRegistry(alias.to_string()))?;

    let link = &store.paths().active_link;
    ensure_link_replaceable(store)?;
    if !link.exists() {
        return Err(NpmrcError::NoActiveProfile(link.clone()).into());
    }

    let content =
        fs::read_to_string(link).with_context(|| format!("Failed to read {}", link.display()))?;
    fs::write(link, rewrite_registry(&content, url))
        .with_context(|| format!("Failed to write {}", link.display()))?;
    debug!(registry = url, "rewrote registry directive");

    Ok(url)
}
