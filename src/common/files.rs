//! File operations shared by the stager, the descriptor writer and the collector.

use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Copy a single file, printing a progress line.
///
/// Directories are rejected by the underlying copy and surface as
/// [`Error::Copy`] naming both paths.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    let bytes = fs::copy(src, dst).map_err(|source| Error::Copy {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    })?;
    println!("File copied: {} -> {}", src.display(), dst.display());
    Ok(bytes)
}

/// Write a file, creating parent directories as needed.
pub fn write_file_with_dirs<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

/// Hex-encoded SHA-256 of a file.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
