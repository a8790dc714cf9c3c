//! mkrpm - build an RPM from a directory of files.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use mkrpm::clean::CleanPolicy;
use mkrpm::collect::MatchMode;
use mkrpm::commands;
use mkrpm::config::Config;
use mkrpm::descriptor::Section;
use mkrpm::PackageIdentity;

#[derive(Parser)]
#[command(name = "mkrpm")]
#[command(about = "Package a directory of files into an RPM with rpmbuild")]
#[command(
    after_help = "QUICK START:\n  mkrpm preflight   Check rpmbuild is available\n  mkrpm build --source-dir dist --output-dir out --name demo --version 1.0 --release 1 --arch x86_64\n  mkrpm clean --output-dir out   Remove the working tree"
)]
struct Cli {
    /// Show debug logging (or set MKRPM_LOG)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IdentityArgs {
    /// Package name
    #[arg(long)]
    name: String,

    /// Package version
    #[arg(long)]
    version: String,

    /// Package release
    #[arg(long)]
    release: String,

    /// Package architecture (e.g. x86_64, noarch)
    #[arg(long)]
    arch: String,
}

impl IdentityArgs {
    fn into_identity(self) -> mkrpm::Result<PackageIdentity> {
        PackageIdentity::new(self.name, self.version, self.release, self.arch)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Stage files, write the spec, run rpmbuild and collect the packages
    Build {
        /// Directory of input files (copied non-recursively)
        #[arg(long)]
        source_dir: PathBuf,

        /// Destination for the working tree and the collected packages
        #[arg(long)]
        output_dir: PathBuf,

        #[command(flatten)]
        identity: IdentityArgs,

        /// Builder command the spec path is appended to [default: rpmbuild -ba]
        #[arg(long)]
        builder: Option<String>,

        /// Don't pass --define "_topdir <output-dir>/rpmbuild" to the builder
        #[arg(long)]
        no_topdir: bool,

        /// License tag [default: MIT]
        #[arg(long)]
        license: Option<String>,

        /// Summary tag [default: "<name> RPM package"]
        #[arg(long)]
        summary: Option<String>,

        /// Replace a section body with a file's contents (prep, build, install, files, changelog)
        #[arg(long = "section", value_name = "NAME=FILE", value_parser = parse_section)]
        sections: Vec<(Section, PathBuf)>,

        /// When to remove the working tree: none, before, after, both
        #[arg(long)]
        clean: Option<CleanPolicy>,

        /// Artifact matching: loose (<name>*) or strict (<name>-<version>-<release>.*)
        #[arg(long = "match")]
        match_mode: Option<MatchMode>,

        /// Succeed even if the build produced no matching packages
        #[arg(long)]
        allow_empty: bool,

        /// Also collect source RPMs from SRPMS/
        #[arg(long)]
        with_srpm: bool,
    },

    /// Check the builder and configuration
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Remove <output-dir>/rpmbuild
    Clean {
        #[arg(long)]
        output_dir: PathBuf,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show resolved configuration
    Config,
    /// Print the spec file that would be generated
    Descriptor {
        #[command(flatten)]
        identity: IdentityArgs,

        #[arg(long)]
        license: Option<String>,

        #[arg(long)]
        summary: Option<String>,
    },
}

fn parse_section(s: &str) -> std::result::Result<(Section, PathBuf), String> {
    let (name, file) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=FILE, got '{}'", s))?;
    if file.is_empty() {
        return Err(format!("missing file for section '{}'", name));
    }
    Ok((name.parse()?, PathBuf::from(file)))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,mkrpm=debug")
    } else {
        EnvFilter::try_from_env("MKRPM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            source_dir,
            output_dir,
            identity,
            builder,
            no_topdir,
            license,
            summary,
            sections,
            clean,
            match_mode,
            allow_empty,
            with_srpm,
        } => {
            let config = Config::from_env()?;
            let args = commands::build::BuildArgs {
                source_dir,
                output_dir,
                name: identity.name,
                version: identity.version,
                release: identity.release,
                arch: identity.arch,
                builder,
                no_topdir,
                license,
                summary,
                sections,
                clean,
                match_mode,
                allow_empty,
                with_srpm,
            };
            commands::cmd_build(args, &config)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(strict)?;
        }

        Commands::Clean { output_dir } => {
            commands::cmd_clean(&output_dir)?;
        }

        Commands::Show { what } => {
            let config = Config::from_env()?;
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Descriptor {
                    identity,
                    license,
                    summary,
                } => commands::show::ShowTarget::Descriptor {
                    identity: identity.into_identity()?,
                    license,
                    summary,
                },
            };
            commands::cmd_show(show_target, &config)?;
        }
    }

    Ok(())
}

/// Exit code of the first packaging error in the chain, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<mkrpm::Error>())
        .map(mkrpm::Error::exit_code)
        .unwrap_or(1)
}
