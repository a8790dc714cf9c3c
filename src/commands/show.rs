//! Show command - displays information.

use anyhow::Result;

use crate::config::Config;
use crate::descriptor::SpecTemplate;
use crate::identity::PackageIdentity;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show resolved configuration
    Config,
    /// Render the spec file to stdout without touching the filesystem
    Descriptor {
        identity: PackageIdentity,
        license: Option<String>,
        summary: Option<String>,
    },
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Descriptor {
            identity,
            license,
            summary,
        } => {
            let mut template = SpecTemplate::new(license.unwrap_or_else(|| config.license.clone()));
            if let Some(summary) = summary {
                template = template.summary(summary);
            }
            print!("{}", template.render(&identity));
        }
    }
    Ok(())
}
