//! Bundler bootstrap.
//!
//! Before a bundle can be installed the `bundler` gem itself has to be
//! present. [`PackageInstaller`] is the seam for that: the provider asks for
//! a package at a [`VersionPolicy`] and does not care how it gets there.
//! [`GemInstaller`] is the RubyGems implementation.

use std::path::{Path, PathBuf};

use crate::error::{GemsyncError, Result};
use crate::output::parse_executable_directory;
use crate::shell::{display_command, CommandOptions, ProcessRunner};

/// Gem that provides the `bundle` executable.
pub const BUNDLER_GEM: &str = "bundler";

/// Which version of a package to ensure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionPolicy {
    /// Exactly this version; never upgrades.
    Pinned(String),
    /// Upgrade to the newest available release.
    Latest,
}

impl VersionPolicy {
    /// Pin when a version is given, otherwise upgrade.
    pub fn from_version(version: Option<&str>) -> Self {
        match version {
            Some(v) => VersionPolicy::Pinned(v.to_string()),
            None => VersionPolicy::Latest,
        }
    }
}

/// A request to ensure a package is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    pub name: String,
    pub version: VersionPolicy,
    pub gem_binary: Option<PathBuf>,
}

/// Installs tool packages.
///
/// Implementations report failure only; whether anything was installed is
/// not reported.
pub trait PackageInstaller {
    fn ensure_package(&self, request: &PackageRequest) -> Result<()>;
}

/// [`PackageInstaller`] that drives the `gem` command.
pub struct GemInstaller<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> GemInstaller<'a> {
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self { runner }
    }

    fn gem(&self, gem_binary: &Path, args: &[&str]) -> Vec<String> {
        let mut argv = vec![gem_binary.to_string_lossy().into_owned()];
        argv.extend(args.iter().map(|a| a.to_string()));
        argv
    }

    fn is_installed(&self, gem_binary: &Path, name: &str, version: Option<&str>) -> Result<bool> {
        let mut args = vec!["list", "--installed", name];
        if let Some(v) = version {
            args.extend(["--version", v]);
        }
        let argv = self.gem(gem_binary, &args);
        let result = self.runner.run(&argv, &CommandOptions::default())?;
        // `gem list --installed` prints true/false and exits 1 when missing.
        Ok(result.success && result.stdout.trim() == "true")
    }

    fn run_checked(&self, name: &str, argv: &[String]) -> Result<()> {
        tracing::info!("Running {}", display_command(argv));
        let result = self.runner.run(argv, &CommandOptions::default())?;
        if result.success {
            Ok(())
        } else {
            Err(GemsyncError::BootstrapFailed {
                package: name.to_string(),
                message: format!(
                    "`{}` exited with code {:?}\n{}{}",
                    display_command(argv),
                    result.exit_code,
                    result.stdout,
                    result.stderr
                ),
            })
        }
    }
}

impl PackageInstaller for GemInstaller<'_> {
    fn ensure_package(&self, request: &PackageRequest) -> Result<()> {
        let gem_binary = request
            .gem_binary
            .clone()
            .unwrap_or_else(|| PathBuf::from("gem"));
        let name = request.name.as_str();

        match &request.version {
            VersionPolicy::Pinned(version) => {
                if self.is_installed(&gem_binary, name, Some(version.as_str()))? {
                    tracing::debug!("{} {} already installed", name, version);
                    return Ok(());
                }
                let argv = self.gem(
                    &gem_binary,
                    &["install", name, "--version", version.as_str(), "--no-document"],
                );
                self.run_checked(name, &argv)
            }
            VersionPolicy::Latest => {
                let subcommand = if self.is_installed(&gem_binary, name, None)? {
                    "update"
                } else {
                    "install"
                };
                let argv = self.gem(&gem_binary, &[subcommand, name, "--no-document"]);
                self.run_checked(name, &argv)
            }
        }
    }
}

/// Find the directory RubyGems installs executables into.
///
/// Runs `<gem_binary> environment` and reads its `EXECUTABLE DIRECTORY`.
pub fn executable_dir(runner: &dyn ProcessRunner, gem_binary: &Path) -> Result<PathBuf> {
    let argv = vec![
        gem_binary.to_string_lossy().into_owned(),
        "environment".to_string(),
    ];
    let result = runner
        .run(&argv, &CommandOptions::default())?
        .into_checked(&argv)?;

    parse_executable_directory(&result.stdout).ok_or_else(|| GemsyncError::ToolEnvironmentParse {
        gem_binary: gem_binary.to_path_buf(),
        output: result.stdout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;

    fn request(version: VersionPolicy) -> PackageRequest {
        PackageRequest {
            name: BUNDLER_GEM.to_string(),
            version,
            gem_binary: Some(PathBuf::from("/usr/bin/gem")),
        }
    }

    #[test]
    fn policy_from_version() {
        assert_eq!(VersionPolicy::from_version(None), VersionPolicy::Latest);
        assert_eq!(
            VersionPolicy::from_version(Some("2.4.22")),
            VersionPolicy::Pinned("2.4.22".into())
        );
    }

    #[test]
    fn pinned_version_already_present_skips_install() {
        let runner = MockRunner::new();
        runner.succeed("true\n");
        GemInstaller::new(&runner)
            .ensure_package(&request(VersionPolicy::Pinned("2.4.22".into())))
            .unwrap();

        assert_eq!(
            runner.commands(),
            vec!["/usr/bin/gem list --installed bundler --version 2.4.22"]
        );
    }

    #[test]
    fn pinned_version_missing_installs_exact_version() {
        let runner = MockRunner::new();
        runner
            .fail(1, "false\n", "")
            .succeed("Successfully installed bundler-2.4.22");
        GemInstaller::new(&runner)
            .ensure_package(&request(VersionPolicy::Pinned("2.4.22".into())))
            .unwrap();

        assert_eq!(
            runner.commands()[1],
            "/usr/bin/gem install bundler --version 2.4.22 --no-document"
        );
    }

    #[test]
    fn latest_upgrades_installed_gem() {
        let runner = MockRunner::new();
        runner.succeed("true\n").succeed("Updating installed gems");
        GemInstaller::new(&runner)
            .ensure_package(&request(VersionPolicy::Latest))
            .unwrap();

        let commands = runner.commands();
        assert_eq!(commands[0], "/usr/bin/gem list --installed bundler");
        assert_eq!(commands[1], "/usr/bin/gem update bundler --no-document");
        assert!(commands.iter().all(|c| !c.contains("--version")));
    }

    #[test]
    fn latest_installs_missing_gem() {
        let runner = MockRunner::new();
        runner.fail(1, "false\n", "").succeed("");
        GemInstaller::new(&runner)
            .ensure_package(&request(VersionPolicy::Latest))
            .unwrap();

        assert_eq!(
            runner.commands()[1],
            "/usr/bin/gem install bundler --no-document"
        );
    }

    #[test]
    fn missing_gem_binary_defaults_to_path_lookup() {
        let runner = MockRunner::new();
        runner.succeed("true\n").succeed("");
        let mut req = request(VersionPolicy::Latest);
        req.gem_binary = None;
        GemInstaller::new(&runner).ensure_package(&req).unwrap();

        assert_eq!(runner.commands()[0], "gem list --installed bundler");
    }

    #[test]
    fn failed_install_is_bootstrap_failure() {
        let runner = MockRunner::new();
        runner.fail(1, "false\n", "").fail(
            2,
            "ERROR: Could not find a valid gem 'bundler'",
            "gem error",
        );
        let err = GemInstaller::new(&runner)
            .ensure_package(&request(VersionPolicy::Pinned("99.0".into())))
            .unwrap_err();

        match err {
            GemsyncError::BootstrapFailed { package, message } => {
                assert_eq!(package, "bundler");
                assert!(message.contains("Could not find a valid gem"));
                assert!(message.contains("gem error"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn executable_dir_parses_environment() {
        let runner = MockRunner::new();
        runner.succeed("RubyGems Environment:\n  - EXECUTABLE DIRECTORY: /opt/ruby/bin\n");
        let dir = executable_dir(&runner, Path::new("/opt/ruby/bin/gem")).unwrap();

        assert_eq!(dir, PathBuf::from("/opt/ruby/bin"));
        assert_eq!(runner.commands(), vec!["/opt/ruby/bin/gem environment"]);
    }

    #[test]
    fn executable_dir_missing_line_is_parse_error() {
        let runner = MockRunner::new();
        runner.succeed("RubyGems Environment:\n");
        let err = executable_dir(&runner, Path::new("/usr/bin/gem")).unwrap_err();

        assert!(matches!(err, GemsyncError::ToolEnvironmentParse { .. }));
    }

    #[test]
    fn executable_dir_nonzero_exit_is_command_failure() {
        let runner = MockRunner::new();
        runner.fail(1, "", "gem: command not found");
        let err = executable_dir(&runner, Path::new("/usr/bin/gem")).unwrap_err();

        assert!(matches!(err, GemsyncError::CommandFailed { .. }));
    }
}
