//! `gemsync install` and `gemsync update`.

use std::path::{Path, PathBuf};

use crate::bootstrap::GemInstaller;
use crate::cli::args::ConvergeArgs;
use crate::config::load_desired_state;
use crate::desired::Action;
use crate::error::Result;
use crate::output::ChangeVerdict;
use crate::provider::ConvergenceProvider;
use crate::shell::{ProcessRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Converges the bundle for one action.
pub struct ConvergeCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
    action: Action,
    args: ConvergeArgs,
}

impl ConvergeCommand {
    pub fn new(
        project_root: &Path,
        config: Option<&Path>,
        action: Action,
        args: ConvergeArgs,
    ) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.map(Path::to_path_buf),
            action,
            args,
        }
    }

    /// Run against the given process runner.
    pub fn run_with(
        &self,
        ui: &mut dyn UserInterface,
        runner: &dyn ProcessRunner,
    ) -> Result<CommandResult> {
        let overrides = self.args.bundle.to_config(&self.project_root)?;
        let state = load_desired_state(&self.project_root, self.config.as_deref(), overrides)?;

        let installer = GemInstaller::new(runner);
        let mut provider =
            ConvergenceProvider::new(state, runner, &installer).with_dry_run(self.args.dry_run);
        let outcome = provider.converge(self.action)?;

        if self.args.json {
            let json = serde_json::to_string_pretty(&outcome).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        if outcome.manifest.is_none() {
            ui.warning("No Gemfile found; bundler used its own lookup");
        }
        ui.show_command(&outcome.command.to_string());
        ui.show_output(&outcome.stdout);

        if outcome.dry_run {
            ui.message(&format!("Would run: {}", outcome.command));
            return Ok(CommandResult::success());
        }

        match outcome.verdict {
            ChangeVerdict::Changed => {
                ui.success(&format!("bundle {}: gems installed", self.action));
            }
            ChangeVerdict::Unchanged => {
                ui.success(&format!("bundle {}: already up to date", self.action));
            }
        }

        Ok(CommandResult::success())
    }
}

impl Command for ConvergeCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.run_with(ui, &SystemRunner)
    }
}
