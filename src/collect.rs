//! Collector: picks the builder's artifacts out of the working tree.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use glob::Pattern;
use tracing::{debug, warn};

use crate::common::{copy_file, sha256_file};
use crate::error::{Error, Result};
use crate::identity::PackageIdentity;
use crate::stage::WorkTree;

/// How artifact file names are matched against the package identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// `<name>*.rpm`. Also picks up stale artifacts of other versions.
    #[default]
    Loose,
    /// `<name>-<version>-<release>.*.rpm`. Other versions and releases are skipped.
    Strict,
}

impl MatchMode {
    pub fn prefix(self, identity: &PackageIdentity) -> String {
        match self {
            MatchMode::Loose => identity.name.clone(),
            // The trailing dot keeps release 1 from matching release 10.
            MatchMode::Strict => format!("{}.", identity.nvr()),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loose" => Ok(MatchMode::Loose),
            "strict" => Ok(MatchMode::Strict),
            _ => Err("expected one of: loose, strict".to_string()),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchMode::Loose => "loose",
            MatchMode::Strict => "strict",
        })
    }
}

/// A collected package file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Location in the output directory.
    pub path: PathBuf,
    /// Hex SHA-256 of the collected file.
    pub sha256: String,
}

/// Glob pattern for `<dir>/<prefix>*<suffix>` with the literal parts escaped.
pub fn artifact_pattern(dir: &Path, prefix: &str, suffix: &str) -> Result<String> {
    let dir = dir.to_str().ok_or_else(|| Error::NonUtf8Path {
        path: dir.to_path_buf(),
    })?;
    Ok(format!(
        "{}/{}*{}",
        Pattern::escape(dir),
        Pattern::escape(prefix),
        Pattern::escape(suffix)
    ))
}

/// Regular files matching `pattern`, sorted.
pub fn find_matches(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut found = Vec::new();
    for path in paths {
        let path = path.map_err(|source| Error::Scan { source })?;
        if path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    debug!("{} -> {} match(es)", pattern, found.len());
    Ok(found)
}

/// Finds and copies artifacts for one package.
#[derive(Debug, Clone)]
pub struct Collector<'a> {
    tree: &'a WorkTree,
    identity: &'a PackageIdentity,
    mode: MatchMode,
    with_srpms: bool,
    allow_empty: bool,
}

impl<'a> Collector<'a> {
    pub fn new(tree: &'a WorkTree, identity: &'a PackageIdentity) -> Self {
        Self {
            tree,
            identity,
            mode: MatchMode::default(),
            with_srpms: false,
            allow_empty: false,
        }
    }

    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_srpms(mut self, with_srpms: bool) -> Self {
        self.with_srpms = with_srpms;
        self
    }

    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Glob patterns searched, binary RPMs first.
    pub fn patterns(&self) -> Result<Vec<String>> {
        let prefix = self.mode.prefix(self.identity);
        let mut patterns = vec![artifact_pattern(
            &self.tree.rpms(&self.identity.arch),
            &prefix,
            ".rpm",
        )?];
        if self.with_srpms {
            patterns.push(artifact_pattern(&self.tree.srpms(), &prefix, ".src.rpm")?);
        }
        Ok(patterns)
    }

    /// Artifacts present in the tree, without copying anything.
    pub fn find(&self) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for pattern in self.patterns()? {
            found.extend(find_matches(&pattern)?);
        }
        Ok(found)
    }

    /// Copy every matching artifact into `output_dir`, keeping file names.
    pub fn collect(&self, output_dir: &Path) -> Result<Vec<Artifact>> {
        let found = self.find()?;

        if found.is_empty() {
            let pattern = self.patterns()?.join(", ");
            if !self.allow_empty {
                return Err(Error::NoArtifacts { pattern });
            }
            warn!("no artifacts matching {}", pattern);
            println!("[WARN] No artifacts matching {}", pattern);
            return Ok(Vec::new());
        }

        let mut artifacts = Vec::with_capacity(found.len());
        for src in found {
            let Some(file_name) = src.file_name() else {
                continue;
            };
            let dst = output_dir.join(file_name);
            copy_file(&src, &dst)?;
            let sha256 = sha256_file(&dst).map_err(|source| Error::Copy {
                src: src.clone(),
                dst: dst.clone(),
                source,
            })?;
            artifacts.push(Artifact { path: dst, sha256 });
        }
        Ok(artifacts)
    }
}
