//! Preflight command - checks the builder before packaging.

use anyhow::{bail, Result};

use crate::preflight::run_preflight;

/// Execute the preflight command.
pub fn cmd_preflight(strict: bool) -> Result<()> {
    let report = run_preflight();
    report.print();

    if strict && !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before packaging.",
            report.fail_count()
        );
    }

    Ok(())
}
