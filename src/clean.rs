//! Working tree cleanup.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};

/// When the pipeline removes `<output-dir>/rpmbuild`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanPolicy {
    /// Leave the tree for inspection.
    #[default]
    Keep,
    /// Remove it before staging.
    Before,
    /// Remove it once the artifacts are collected.
    After,
    Both,
}

impl CleanPolicy {
    pub fn before(self) -> bool {
        matches!(self, CleanPolicy::Before | CleanPolicy::Both)
    }

    pub fn after(self) -> bool {
        matches!(self, CleanPolicy::After | CleanPolicy::Both)
    }
}

impl FromStr for CleanPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(CleanPolicy::Keep),
            "before" => Ok(CleanPolicy::Before),
            "after" => Ok(CleanPolicy::After),
            "both" => Ok(CleanPolicy::Both),
            _ => Err("expected one of: none, before, after, both".to_string()),
        }
    }
}

impl fmt::Display for CleanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CleanPolicy::Keep => "none",
            CleanPolicy::Before => "before",
            CleanPolicy::After => "after",
            CleanPolicy::Both => "both",
        };
        f.write_str(s)
    }
}

/// Remove a working tree. Returns false when there was nothing to remove.
pub fn remove_work_tree(root: &Path) -> Result<bool> {
    if !root.exists() {
        debug!("no working tree at {}", root.display());
        return Ok(false);
    }

    println!("Removing {}...", root.display());
    fs::remove_dir_all(root).map_err(|source| Error::Clean {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(true)
}
