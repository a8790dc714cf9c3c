//! Build command - packages a directory into an RPM.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;

use crate::builder::RpmBuild;
use crate::clean::CleanPolicy;
use crate::collect::MatchMode;
use crate::config::Config;
use crate::descriptor::{Section, SpecTemplate};
use crate::identity::PackageIdentity;
use crate::pipeline::{self, PackageRequest, PipelineOptions};

/// Arguments of the build command. `None` and `false` defer to [`Config`].
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub builder: Option<String>,
    pub no_topdir: bool,
    pub license: Option<String>,
    pub summary: Option<String>,
    pub sections: Vec<(Section, PathBuf)>,
    pub clean: Option<CleanPolicy>,
    pub match_mode: Option<MatchMode>,
    pub allow_empty: bool,
    pub with_srpm: bool,
}

impl BuildArgs {
    /// Layer command-line flags over the loaded configuration.
    pub fn apply(&self, config: &Config) -> Config {
        let mut config = config.clone();
        if let Some(ref builder) = self.builder {
            config.builder = builder.clone();
        }
        if self.no_topdir {
            config.define_topdir = false;
        }
        if let Some(ref license) = self.license {
            config.license = license.clone();
        }
        if let Some(clean) = self.clean {
            config.clean = clean;
        }
        if let Some(match_mode) = self.match_mode {
            config.match_mode = match_mode;
        }
        config.allow_empty |= self.allow_empty;
        config.collect_srpms |= self.with_srpm;
        config
    }
}

/// Execute the build command.
pub fn cmd_build(args: BuildArgs, config: &Config) -> Result<()> {
    let config = args.apply(config);
    let identity = PackageIdentity::new(&args.name, &args.version, &args.release, &args.arch)?;

    // rpmbuild needs an absolute _topdir.
    let output_dir = std::path::absolute(&args.output_dir)
        .with_context(|| format!("Invalid output directory {}", args.output_dir.display()))?;

    let mut template = SpecTemplate::new(config.license.as_str());
    if let Some(ref summary) = args.summary {
        template = template.summary(summary.as_str());
    }
    for (section, path) in &args.sections {
        template = template.section_from_file(*section, path)?;
    }

    let request = PackageRequest::new(&args.source_dir, &output_dir, identity)
        .template(template)
        .options(PipelineOptions::from(&config));

    let mut builder = RpmBuild::new(config.builder.as_str());
    if config.define_topdir {
        builder = builder.with_topdir(request.work_tree().root());
    }

    println!("=== Packaging {} ===\n", request.identity.nvr());
    let start = Instant::now();
    let report = pipeline::run(&request, &builder)?;

    println!();
    println!("Staged {} file(s)", report.staged.len());
    println!("Spec file: {}", report.descriptor.display());
    for artifact in &report.artifacts {
        println!("  {}  {}", artifact.sha256, artifact.path.display());
    }
    println!(
        "\n=== Done: {} package(s) in {:.1}s ===",
        report.artifacts.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
