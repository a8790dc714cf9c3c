//! Shared test utilities for mkrpm tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use mkrpm::{Builder, Error, Result};

/// Test environment with a source directory and an output directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Flat directory of input files
    pub source_dir: PathBuf,
    /// Destination for the working tree and collected packages
    pub output_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source_dir = temp_dir.path().join("src");
        let output_dir = temp_dir.path().join("out");
        fs::create_dir_all(&source_dir).expect("Failed to create source dir");

        Self {
            _temp_dir: temp_dir,
            source_dir,
            output_dir,
        }
    }

    /// Add an input file.
    pub fn source_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.source_dir.join(name);
        fs::write(&path, content).expect("Failed to create source file");
        path
    }

    /// Regular files directly inside the output directory, sorted.
    pub fn output_files(&self) -> Vec<String> {
        list_files(&self.output_dir)
    }

    pub fn tree(&self) -> PathBuf {
        self.output_dir.join("rpmbuild")
    }

    /// Write an `sh` script into the temp dir and return its path.
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self._temp_dir.path().join(name);
        fs::write(&path, body).expect("Failed to write script");
        path
    }
}

/// Regular file names directly inside `dir`, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Builder stub: drops files into `RPMS/<arch>/` like rpmbuild would, or fails.
pub struct StubBuilder {
    pub arch: String,
    pub emit: Vec<String>,
    pub exit_code: Option<i32>,
}

impl StubBuilder {
    pub fn emitting(arch: &str, files: &[&str]) -> Self {
        Self {
            arch: arch.to_string(),
            emit: files.iter().map(|f| f.to_string()).collect(),
            exit_code: None,
        }
    }

    pub fn failing(code: i32) -> Self {
        Self {
            arch: String::new(),
            emit: Vec::new(),
            exit_code: Some(code),
        }
    }
}

impl Builder for StubBuilder {
    fn build(&self, descriptor: &Path) -> Result<()> {
        if let Some(code) = self.exit_code {
            return Err(Error::BuildFailed {
                program: "rpmbuild".to_string(),
                code: Some(code),
            });
        }

        // descriptor is <tree>/SPECS/<name>.spec
        let tree = descriptor
            .parent()
            .and_then(Path::parent)
            .expect("spec file lives in <tree>/SPECS");
        let rpms = tree.join("RPMS").join(&self.arch);
        fs::create_dir_all(&rpms).expect("Failed to create RPMS dir");
        for file in &self.emit {
            fs::write(rpms.join(file), b"rpm").expect("Failed to emit artifact");
        }
        Ok(())
    }
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to read file: {}", path.display()));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}
