//! Stager: working tree layout and source staging.
//!
//! The tree mirrors what rpmbuild expects under `_topdir`:
//!
//! ```text
//! <output-dir>/rpmbuild/SOURCES/   staged input files
//! <output-dir>/rpmbuild/SPECS/     rendered spec file
//! <output-dir>/rpmbuild/RPMS/<arch>/  builder output
//! <output-dir>/rpmbuild/SRPMS/     builder output (source RPMs)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::copy_file;
use crate::error::{Error, Result};

/// Name of the working tree directory under the output directory.
pub const WORK_TREE_DIR: &str = "rpmbuild";

/// Paths of the working tree for one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkTree {
    root: PathBuf,
}

impl WorkTree {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            root: output_dir.join(WORK_TREE_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sources(&self) -> PathBuf {
        self.root.join("SOURCES")
    }

    pub fn specs(&self) -> PathBuf {
        self.root.join("SPECS")
    }

    pub fn rpms(&self, arch: &str) -> PathBuf {
        self.root.join("RPMS").join(arch)
    }

    pub fn srpms(&self) -> PathBuf {
        self.root.join("SRPMS")
    }

    /// Create `SOURCES` and `SPECS`, reusing whatever already exists.
    pub fn create(&self) -> Result<()> {
        for dir in [self.sources(), self.specs()] {
            fs::create_dir_all(&dir).map_err(|source| Error::WorkTree { path: dir, source })?;
        }
        Ok(())
    }
}

/// Copy every entry of `source_dir` (non-recursive) into the tree's `SOURCES`.
///
/// Returns the staged destination paths, sorted by file name. Existing files
/// in `SOURCES` are overwritten, never removed.
pub fn stage_sources(source_dir: &Path, tree: &WorkTree) -> Result<Vec<PathBuf>> {
    tree.create()?;

    let read_err = |source| Error::SourceDir {
        path: source_dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(source_dir).map_err(read_err)? {
        entries.push(entry.map_err(read_err)?);
    }
    entries.sort_by_key(|entry| entry.file_name());

    let sources = tree.sources();
    let mut staged = Vec::with_capacity(entries.len());
    for entry in entries {
        let dst = sources.join(entry.file_name());
        copy_file(&entry.path(), &dst)?;
        staged.push(dst);
    }

    debug!("staged {} file(s) into {}", staged.len(), sources.display());
    Ok(staged)
}
