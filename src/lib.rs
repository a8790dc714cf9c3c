//! mkrpm - package a directory of files into an RPM.
//!
//! A run is four stages over one working tree:
//! - stage: copy the source directory into `rpmbuild/SOURCES`
//! - describe: render `rpmbuild/SPECS/<name>.spec`
//! - build: hand the spec to `rpmbuild -ba` (or any [`builder::Builder`])
//! - collect: copy `rpmbuild/RPMS/<arch>/<name>*.rpm` next to the tree
//!
//! The packaging itself happens in rpmbuild; this crate only prepares its
//! input and picks up its output.

pub mod builder;
pub mod clean;
pub mod collect;
pub mod commands;
pub mod common;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod stage;
pub mod timing;

pub use builder::{Builder, RpmBuild};
pub use error::{Error, ErrorKind, Result};
pub use identity::PackageIdentity;
pub use pipeline::{run, PackageReport, PackageRequest, PipelineOptions};
