//! Preflight checks.
//!
//! Verifies the configuration parses and the builder can be found before a
//! run is attempted. Run with `mkrpm preflight`.

mod types;

use crate::config::Config;
use crate::process::Cmd;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run all preflight checks against the environment configuration.
pub fn run_preflight() -> PreflightReport {
    let mut checks = Vec::new();

    println!("Running preflight checks...\n");

    let config = match Config::from_env() {
        Ok(config) => {
            checks.push(CheckResult::pass("configuration"));
            config
        }
        Err(e) => {
            checks.push(CheckResult::fail("configuration", &e.to_string()));
            Config::default()
        }
    };

    checks.extend(check_builder(&config.builder));

    if !config.define_topdir {
        checks.push(CheckResult::warn(
            "_topdir",
            "MKRPM_DEFINE_TOPDIR is off; the builder must already use <output-dir>/rpmbuild",
        ));
    }

    PreflightReport { checks }
}

/// Check that the builder's program resolves and answers `--version`.
pub fn check_builder(command: &str) -> Vec<CheckResult> {
    let program = match shlex::split(command).and_then(|argv| argv.into_iter().next()) {
        Some(program) => program,
        None => {
            return vec![CheckResult::fail(
                "builder",
                &format!("Cannot split builder command {:?}", command),
            )]
        }
    };

    let path = match which::which(&program) {
        Ok(path) => path,
        Err(_) => {
            return vec![CheckResult::fail(
                &program,
                "Not found. Install the 'rpm-build' package or set MKRPM_BUILDER",
            )]
        }
    };

    let mut checks = vec![CheckResult::pass_with(&program, &path.display().to_string())];

    match Cmd::new(&path).arg("--version").allow_fail().run() {
        Ok(result) if result.success() => {
            let version = result.stdout_trimmed().lines().next().unwrap_or("");
            checks.push(CheckResult::pass_with("builder version", version));
        }
        _ => checks.push(CheckResult::warn(
            "builder version",
            &format!("'{} --version' did not succeed", program),
        )),
    }

    checks
}
