//! Error type shared by every packaging stage.
//!
//! Each variant belongs to one [`ErrorKind`], and each kind maps to its own
//! process exit code so callers can tell failures apart without parsing
//! the message.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes reported to the calling shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad identity field, option value or path.
    InvalidInput,
    /// Working tree setup or a file copy (stager or collector).
    Stage,
    /// Rendering inputs or writing the spec file.
    Descriptor,
    /// The external builder could not run or exited non-zero.
    Build,
    /// The build succeeded but nothing matched the artifact pattern.
    NoArtifacts,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidInput => 2,
            ErrorKind::Stage => 3,
            ErrorKind::Descriptor => 4,
            ErrorKind::Build => 5,
            ErrorKind::NoArtifacts => 6,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("package {field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("path {} is not valid UTF-8", .path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("cannot read source directory {}", .path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create working tree directory {}", .path.display())]
    WorkTree {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot remove working tree {}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error copying file {} to {}", .src.display(), .dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read section file {}", .path.display())]
    SectionRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write spec file {}", .path.display())]
    DescriptorWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot split builder command line {command:?}")]
    InvalidCommand { command: String },

    #[error("builder '{program}' not found. Is rpm-build installed?")]
    BuilderNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to execute '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' failed ({})", describe_exit(.code))]
    BuildFailed { program: String, code: Option<i32> },

    #[error("invalid artifact pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("cannot scan build output")]
    Scan {
        #[source]
        source: glob::GlobError,
    },

    #[error("no artifacts matching {pattern} after a successful build")]
    NoArtifacts { pattern: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyField { .. } | Error::InvalidValue { .. } | Error::NonUtf8Path { .. } => {
                ErrorKind::InvalidInput
            }
            Error::SourceDir { .. }
            | Error::WorkTree { .. }
            | Error::Clean { .. }
            | Error::Copy { .. }
            | Error::Pattern { .. }
            | Error::Scan { .. } => ErrorKind::Stage,
            Error::SectionRead { .. } | Error::DescriptorWrite { .. } => ErrorKind::Descriptor,
            Error::InvalidCommand { .. }
            | Error::BuilderNotFound { .. }
            | Error::Spawn { .. }
            | Error::BuildFailed { .. } => ErrorKind::Build,
            Error::NoArtifacts { .. } => ErrorKind::NoArtifacts,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    pub(crate) fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
