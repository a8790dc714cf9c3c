//! Shared utilities across mkrpm modules.

pub mod files;

pub use files::{copy_file, sha256_file, write_file_with_dirs};
