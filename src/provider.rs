//! Bundle convergence.
//!
//! A [`ConvergenceProvider`] takes one [`DesiredState`] through
//!
//! ```text
//! Idle -> BootstrappingTool -> Resolving -> Executing -> Classified
//!                    \              \            \
//!                     +--------------+------------+--> Failed
//! ```
//!
//! Bootstrap makes sure bundler is installed, resolving finds the Gemfile and
//! the bundle executable, executing runs `bundle install`/`bundle update`,
//! and classification reads bundler's stdout to decide whether anything
//! changed. Every step runs on the calling thread, one after the other.

use serde::Serialize;
use std::cell::OnceCell;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::bootstrap::{executable_dir, PackageInstaller, PackageRequest, VersionPolicy, BUNDLER_GEM};
use crate::desired::{Action, DesiredState};
use crate::error::{GemsyncError, Result};
use crate::manifest::resolve_manifest_path;
use crate::output::{classify_output, ChangeVerdict};
use crate::planner::{bundle_binary, plan, CommandSpec};
use crate::shell::{CommandOptions, ProcessRunner};

/// Environment variable bundler reads the Gemfile location from.
pub const BUNDLE_GEMFILE: &str = "BUNDLE_GEMFILE";

/// Where a provider is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    BootstrappingTool,
    Resolving,
    Executing,
    Classified,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::BootstrappingTool => "bootstrapping",
            Phase::Resolving => "resolving",
            Phase::Executing => "executing",
            Phase::Classified => "classified",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A bundle command ready to run.
#[derive(Debug, Clone)]
pub struct PlannedCommand {
    pub command: CommandSpec,
    /// Gemfile passed through `BUNDLE_GEMFILE`, if one was found.
    pub manifest: Option<PathBuf>,
    pub options: CommandOptions,
}

/// Outcome of a successful action.
#[derive(Debug, Clone, Serialize)]
pub struct Convergence {
    pub action: Action,
    pub verdict: ChangeVerdict,
    pub command: CommandSpec,
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
    /// Bundler's stdout. Empty for dry runs.
    pub stdout: String,
}

/// Converges one bundle.
pub struct ConvergenceProvider<'a> {
    state: DesiredState,
    runner: &'a dyn ProcessRunner,
    installer: &'a dyn PackageInstaller,
    dry_run: bool,
    phase: Phase,
    manifest: OnceCell<Option<PathBuf>>,
}

impl<'a> ConvergenceProvider<'a> {
    /// Create a provider for `state`.
    pub fn new(
        state: DesiredState,
        runner: &'a dyn ProcessRunner,
        installer: &'a dyn PackageInstaller,
    ) -> Self {
        Self {
            state,
            runner,
            installer,
            dry_run: false,
            phase: Phase::Idle,
            manifest: OnceCell::new(),
        }
    }

    /// Report what would happen without installing or running anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn state(&self) -> &DesiredState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The Gemfile bundler will use, resolved once per provider.
    pub fn manifest_path(&self) -> Result<Option<&Path>> {
        if self.manifest.get().is_none() {
            let resolved = resolve_manifest_path(&self.state.path)?;
            match &resolved {
                Some(path) => tracing::debug!("Using Gemfile {}", path.display()),
                None => tracing::warn!(
                    "No Gemfile found from {}; bundler will report the error",
                    self.state.path.display()
                ),
            }
            let _ = self.manifest.set(resolved);
        }
        Ok(self.manifest.get().and_then(|m| m.as_deref()))
    }

    /// Build the bundle command for `action` without running it.
    ///
    /// Queries `gem environment` for the bundle executable, so the gem
    /// binary must already be usable.
    pub fn plan(&self, action: Action) -> Result<PlannedCommand> {
        let manifest = self.manifest_path()?.map(Path::to_path_buf);
        let bin_dir = executable_dir(self.runner, &self.state.gem_binary)?;
        let command = plan(action, &self.state, &bundle_binary(&bin_dir));

        let mut options = CommandOptions {
            cwd: Some(self.working_dir()),
            user: self.state.user.clone(),
            ..Default::default()
        };
        if let Some(path) = &manifest {
            options
                .env
                .insert(BUNDLE_GEMFILE.to_string(), path.to_string_lossy().into_owned());
        }

        Ok(PlannedCommand {
            command,
            manifest,
            options,
        })
    }

    /// Run `bundle install`.
    pub fn install(&mut self) -> Result<Convergence> {
        self.converge(Action::Install)
    }

    /// Run `bundle update`.
    pub fn update(&mut self) -> Result<Convergence> {
        self.converge(Action::Update)
    }

    /// Take `action` through every phase.
    pub fn converge(&mut self, action: Action) -> Result<Convergence> {
        let result = self.run(action);
        if let Err(e) = &result {
            tracing::debug!("bundle {} failed during {}: {}", action, self.phase, e);
            self.transition(Phase::Failed);
        }
        result
    }

    fn run(&mut self, action: Action) -> Result<Convergence> {
        self.transition(Phase::BootstrappingTool);
        self.bootstrap()?;

        self.transition(Phase::Resolving);
        let planned = self.plan(action)?;

        self.transition(Phase::Executing);
        if self.dry_run {
            tracing::info!("Would run: {}", planned.command);
            self.transition(Phase::Classified);
            return Ok(Convergence {
                action,
                verdict: ChangeVerdict::Changed,
                command: planned.command,
                manifest: planned.manifest,
                dry_run: true,
                stdout: String::new(),
            });
        }

        tracing::info!("Running {}", planned.command);
        let argv = planned.command.argv();
        let result = self
            .runner
            .run(&argv, &planned.options)?
            .into_checked(&argv)?;

        let verdict = classify_output(&result.stdout);
        self.transition(Phase::Classified);
        tracing::info!("bundle {} finished: {:?}", action, verdict);

        Ok(Convergence {
            action,
            verdict,
            command: planned.command,
            manifest: planned.manifest,
            dry_run: false,
            stdout: result.stdout,
        })
    }

    /// Ensure bundler is installed. Its own change status is not reported.
    fn bootstrap(&self) -> Result<()> {
        let request = PackageRequest {
            name: BUNDLER_GEM.to_string(),
            version: VersionPolicy::from_version(self.state.bundler_version.as_deref()),
            gem_binary: Some(self.state.gem_binary.clone()),
        };

        if self.dry_run {
            tracing::info!("Would ensure {} {:?}", request.name, request.version);
            return Ok(());
        }

        self.installer
            .ensure_package(&request)
            .map_err(|e| match e {
                e @ GemsyncError::BootstrapFailed { .. } => e,
                other => GemsyncError::BootstrapFailed {
                    package: request.name.clone(),
                    message: other.to_string(),
                },
            })
    }

    /// Directory bundle runs in: the path itself, or the directory holding it.
    fn working_dir(&self) -> PathBuf {
        if self.state.path.is_file() {
            self.state
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.state.path.clone())
        } else {
            self.state.path.clone()
        }
    }

    fn transition(&mut self, next: Phase) {
        tracing::debug!("{} -> {}", self.phase, next);
        self.phase = next;
    }
}
