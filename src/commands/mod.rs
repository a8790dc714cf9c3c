//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - Stage, describe, build and collect one package
//! - `clean` - Remove a working tree
//! - `preflight` - Check the builder and configuration
//! - `show` - Display configuration or a rendered spec file

pub mod build;
pub mod clean;
mod preflight;
pub mod show;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use preflight::cmd_preflight;
pub use show::cmd_show;
