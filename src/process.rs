//! External command execution.
//!
//! Two modes: [`Cmd::run`] captures output for short queries (preflight),
//! [`Cmd::status`] inherits stdio so a long-running builder streams straight
//! to the terminal.

use anyhow::{bail, Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

/// Result of a captured command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code, or -1 if terminated by signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Builder for configuring command execution.
pub struct Cmd {
    program: PathBuf,
    args: Vec<String>,
    /// If true, `run` doesn't fail on non-zero exit.
    allow_fail: bool,
}

impl Cmd {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            allow_fail: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        debug!("exec {} {:?}", self.program.display(), self.args);
        cmd
    }

    /// Run the command and capture output. Fails with stderr on non-zero exit.
    pub fn run(self) -> Result<CommandResult> {
        let output = self.command().output().with_context(|| {
            format!("Failed to execute '{}'. Is it installed?", self.program.display())
        })?;

        let result = CommandResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !self.allow_fail && !result.success() {
            let stderr = result.stderr_trimmed();
            if stderr.is_empty() {
                bail!("'{}' failed (exit code {})", self.program.display(), result.code());
            } else {
                bail!(
                    "'{}' failed (exit code {}):\n{}",
                    self.program.display(),
                    result.code(),
                    stderr
                );
            }
        }

        Ok(result)
    }

    /// Run with inherited stdio and wait for exit.
    ///
    /// The exit status is returned as-is; interpreting it is up to the caller.
    pub fn status(self) -> io::Result<ExitStatus> {
        let mut cmd = self.command();
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
        cmd.status()
    }
}
