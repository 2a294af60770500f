//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{BundleConfig, DirToggle};
use crate::desired::Action;
use crate::error::Result;

/// gemsync - Converge a Ruby bundle to its Gemfile.
#[derive(Debug, Parser)]
#[command(name = "gemsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .gemsync.yml)
    #[arg(short, long, global = true, env = "GEMSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show the bundle command and its output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install the bundle (bundle install)
    Install(ConvergeArgs),

    /// Update the bundle (bundle update)
    Update(ConvergeArgs),

    /// Print the bundle command that would run
    Plan(PlanArgs),

    /// Print the Gemfile bundler would use
    Locate(LocateArgs),
}

/// Bundle attributes accepted on the command line.
///
/// Each one overrides the matching `bundle:` key in the config file.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BundleArgs {
    /// Gemfile, or directory to search upward from
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Generate binstubs, optionally into DIR
    #[arg(long, value_name = "DIR", num_args = 0..=1, require_equals = true)]
    pub binstubs: Option<Option<String>>,

    /// Install into vendor/bundle, or into DIR
    #[arg(long, value_name = "DIR", num_args = 0..=1, require_equals = true)]
    pub vendor: Option<Option<String>>,

    /// Exact bundler version to install (default: latest)
    #[arg(long, value_name = "VERSION")]
    pub bundler_version: Option<String>,

    /// Install in deployment mode
    #[arg(long, overrides_with = "no_deployment")]
    pub deployment: bool,

    /// Turn off deployment mode set in the config file
    #[arg(long, overrides_with = "deployment")]
    pub no_deployment: bool,

    /// gem executable used to install bundler
    #[arg(long, value_name = "PATH")]
    pub gem_binary: Option<PathBuf>,

    /// Number of parallel install jobs
    #[arg(long, value_name = "N")]
    pub jobs: Option<u32>,

    /// Number of times bundler retries network requests
    #[arg(long, value_name = "N")]
    pub retry: Option<u32>,

    /// Run the bundle command as USER
    #[arg(long, value_name = "USER")]
    pub user: Option<String>,

    /// Groups to skip (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "GROUPS")]
    pub without: Vec<String>,
}

impl BundleArgs {
    /// Convert to a config overlay. Relative paths resolve against
    /// `project_root`.
    pub fn to_config(&self, project_root: &Path) -> Result<BundleConfig> {
        let path = match &self.path {
            Some(p) => Some(std::path::absolute(project_root.join(p))?),
            None => None,
        };

        // Bare names are left for the PATH lookup.
        let gem_binary = match &self.gem_binary {
            Some(p) if p.components().count() > 1 || p.is_absolute() => {
                Some(std::path::absolute(project_root.join(p))?)
            }
            other => other.clone(),
        };

        let deployment = if self.no_deployment {
            Some(false)
        } else {
            self.deployment.then_some(true)
        };

        Ok(BundleConfig {
            path,
            binstubs: self.binstubs.clone().map(toggle),
            bundler_version: self.bundler_version.clone(),
            deployment,
            gem_binary,
            jobs: self.jobs,
            retry: self.retry,
            user: self.user.clone(),
            vendor: self.vendor.clone().map(toggle),
            without: (!self.without.is_empty()).then(|| self.without.clone()),
        })
    }
}

fn toggle(value: Option<String>) -> DirToggle {
    match value {
        Some(dir) => DirToggle::Dir(dir),
        None => DirToggle::Enabled(true),
    }
}

/// Arguments for the `install` and `update` commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConvergeArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,

    /// Show what would run without installing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `plan` command.
#[derive(Debug, Clone, clap::Args)]
pub struct PlanArgs {
    /// Action to plan
    #[arg(value_enum, default_value = "install")]
    pub action: Action,

    #[command(flatten)]
    pub bundle: BundleArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `locate` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LocateArgs {
    /// Gemfile or directory to search from (default: bundle path)
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gemsync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_install_flags() {
        let cli = parse(&[
            "install",
            "--binstubs",
            "--vendor=vendor/gems",
            "--jobs",
            "4",
            "--without",
            "test,development",
            "--dry-run",
        ]);

        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.bundle.binstubs, Some(None));
                assert_eq!(args.bundle.vendor, Some(Some("vendor/gems".into())));
                assert_eq!(args.bundle.jobs, Some(4));
                assert_eq!(args.bundle.without, vec!["test", "development"]);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn binstubs_does_not_swallow_positional() {
        let cli = parse(&["plan", "--binstubs", "update"]);
        match cli.command {
            Commands::Plan(args) => {
                assert_eq!(args.action, Action::Update);
                assert_eq!(args.bundle.binstubs, Some(None));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn plan_defaults_to_install() {
        match parse(&["plan"]).command {
            Commands::Plan(args) => assert_eq!(args.action, Action::Install),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["gemsync"]).is_err());
    }

    #[test]
    fn to_config_only_sets_given_fields() {
        let args = BundleArgs {
            vendor: Some(None),
            retry: Some(2),
            ..Default::default()
        };
        let config = args.to_config(Path::new("/srv/app")).unwrap();

        assert_eq!(config.vendor, Some(DirToggle::Enabled(true)));
        assert_eq!(config.retry, Some(2));
        assert_eq!(config.deployment, None);
        assert_eq!(config.without, None);
        assert_eq!(config.path, None);
    }

    #[test]
    fn to_config_resolves_relative_path() {
        let args = BundleArgs {
            path: Some(PathBuf::from("web")),
            deployment: true,
            ..Default::default()
        };
        let config = args.to_config(Path::new("/srv/app")).unwrap();

        assert_eq!(config.path, Some(PathBuf::from("/srv/app/web")));
        assert_eq!(config.deployment, Some(true));
    }

    #[test]
    fn relative_gem_binary_resolves_against_project_root() {
        let args = BundleArgs {
            gem_binary: Some(PathBuf::from("./bin/gem")),
            ..Default::default()
        };
        let config = args.to_config(Path::new("/srv/app")).unwrap();

        assert_eq!(config.gem_binary, Some(PathBuf::from("/srv/app/bin/gem")));
    }

    #[test]
    fn bare_gem_binary_is_left_for_lookup() {
        let args = BundleArgs {
            gem_binary: Some(PathBuf::from("gem3.2")),
            ..Default::default()
        };
        let config = args.to_config(Path::new("/srv/app")).unwrap();

        assert_eq!(config.gem_binary, Some(PathBuf::from("gem3.2")));
    }

    #[test]
    fn no_deployment_turns_deployment_off() {
        let cli = parse(&["install", "--no-deployment"]);
        let Commands::Install(args) = cli.command else {
            panic!("expected install");
        };
        let config = args.bundle.to_config(Path::new("/srv/app")).unwrap();

        assert_eq!(config.deployment, Some(false));
    }

    #[test]
    fn last_deployment_flag_wins() {
        let cli = parse(&["install", "--no-deployment", "--deployment"]);
        let Commands::Install(args) = cli.command else {
            panic!("expected install");
        };

        assert!(args.bundle.deployment);
        assert!(!args.bundle.no_deployment);
    }
}
