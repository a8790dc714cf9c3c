//! Builder invoker.
//!
//! The package itself is produced by an external tool, normally
//! `rpmbuild -ba`. [`Builder`] is the seam: the pipeline only needs
//! "build this spec file", so tests substitute a stub that drops files into
//! the tree instead of running rpmbuild.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::process::Cmd;

/// Something that turns a spec file into packages.
pub trait Builder {
    /// Build the package described by `descriptor`, blocking until done.
    fn build(&self, descriptor: &Path) -> Result<()>;
}

/// Runs an rpmbuild-compatible command with the spec path appended.
#[derive(Debug, Clone)]
pub struct RpmBuild {
    command: String,
    topdir: Option<PathBuf>,
}

impl RpmBuild {
    /// `command` is a shell-style prefix such as `rpmbuild -ba`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            topdir: None,
        }
    }

    /// Pass `--define "_topdir <topdir>"` so rpmbuild uses the working tree
    /// instead of `~/rpmbuild`.
    pub fn with_topdir(mut self, topdir: &Path) -> Self {
        self.topdir = Some(topdir.to_path_buf());
        self
    }

    /// Full command line, with the spec path (and topdir) shell-quoted.
    pub fn command_line(&self, descriptor: &Path) -> Result<String> {
        let mut line = self.command.trim().to_string();
        if let Some(ref topdir) = self.topdir {
            let define = format!("_topdir {}", path_str(topdir)?);
            line.push_str(" --define ");
            line.push_str(&quote(&define)?);
        }
        line.push(' ');
        line.push_str(&quote(path_str(descriptor)?)?);
        Ok(line)
    }

    /// Argument vector produced by splitting [`Self::command_line`].
    pub fn argv(&self, descriptor: &Path) -> Result<Vec<String>> {
        let line = self.command_line(descriptor)?;
        match shlex::split(&line) {
            Some(argv) if !argv.is_empty() => Ok(argv),
            _ => Err(Error::InvalidCommand { command: line }),
        }
    }
}

impl Builder for RpmBuild {
    fn build(&self, descriptor: &Path) -> Result<()> {
        let mut argv = self.argv(descriptor)?.into_iter();
        let program = argv.next().unwrap_or_default();

        let resolved = which::which(&program).map_err(|source| Error::BuilderNotFound {
            program: program.clone(),
            source,
        })?;
        debug!("resolved builder {} to {}", program, resolved.display());
        info!("building {}", descriptor.display());

        let status = Cmd::new(&resolved)
            .args(argv)
            .status()
            .map_err(|source| Error::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::BuildFailed {
                program,
                code: status.code(),
            });
        }
        Ok(())
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| Error::NonUtf8Path {
        path: path.to_path_buf(),
    })
}

fn quote(word: &str) -> Result<String> {
    shlex::try_quote(word)
        .map(|quoted| quoted.into_owned())
        .map_err(|_| Error::InvalidCommand {
            command: word.to_string(),
        })
}
