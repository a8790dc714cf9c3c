//! The packaging run: stage, describe, build, collect.
//!
//! Stages run strictly in order and the first failure ends the run. Nothing
//! is retried and nothing already written is rolled back.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::builder::Builder;
use crate::clean::{remove_work_tree, CleanPolicy};
use crate::collect::{Artifact, Collector, MatchMode};
use crate::config::Config;
use crate::descriptor::{write_descriptor, SpecTemplate};
use crate::error::Result;
use crate::identity::PackageIdentity;
use crate::stage::{stage_sources, WorkTree};
use crate::timing::Timer;

/// Knobs that change how the run treats the tree and the artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineOptions {
    pub clean: CleanPolicy,
    pub match_mode: MatchMode,
    pub allow_empty: bool,
    pub collect_srpms: bool,
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            clean: config.clean,
            match_mode: config.match_mode,
            allow_empty: config.allow_empty,
            collect_srpms: config.collect_srpms,
        }
    }
}

/// One packaging request.
#[derive(Debug, Clone)]
pub struct PackageRequest {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub identity: PackageIdentity,
    pub template: SpecTemplate,
    pub options: PipelineOptions,
}

impl PackageRequest {
    pub fn new(source_dir: &Path, output_dir: &Path, identity: PackageIdentity) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            identity,
            template: SpecTemplate::default(),
            options: PipelineOptions::default(),
        }
    }

    pub fn template(mut self, template: SpecTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn work_tree(&self) -> WorkTree {
        WorkTree::new(&self.output_dir)
    }
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub staged: Vec<PathBuf>,
    pub descriptor: PathBuf,
    pub artifacts: Vec<Artifact>,
}

/// Run every stage for `request`, building with `builder`.
pub fn run(request: &PackageRequest, builder: &dyn Builder) -> Result<PackageReport> {
    let tree = request.work_tree();
    let identity = &request.identity;
    let options = request.options;
    info!(
        "packaging {} from {} into {}",
        identity.nvr(),
        request.source_dir.display(),
        request.output_dir.display()
    );

    if options.clean.before() {
        remove_work_tree(tree.root())?;
    }

    let timer = Timer::start("stage sources");
    let staged = stage_sources(&request.source_dir, &tree)?;
    timer.finish();

    let timer = Timer::start("write spec");
    let spec = request.template.render(identity);
    let descriptor = write_descriptor(&tree, identity, &spec)?;
    timer.finish();

    let timer = Timer::start("rpmbuild");
    builder.build(&descriptor)?;
    println!("RPM package created successfully");
    timer.finish();

    let timer = Timer::start("collect artifacts");
    let artifacts = Collector::new(&tree, identity)
        .mode(options.match_mode)
        .with_srpms(options.collect_srpms)
        .allow_empty(options.allow_empty)
        .collect(&request.output_dir)?;
    timer.finish();

    if options.clean.after() {
        remove_work_tree(tree.root())?;
    }

    Ok(PackageReport {
        staged,
        descriptor,
        artifacts,
    })
}
