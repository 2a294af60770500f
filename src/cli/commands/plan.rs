//! `gemsync plan`: print the bundle command without running it.

use std::path::{Path, PathBuf};

use crate::bootstrap::GemInstaller;
use crate::cli::args::PlanArgs;
use crate::config::load_desired_state;
use crate::error::Result;
use crate::provider::{ConvergenceProvider, BUNDLE_GEMFILE};
use crate::shell::{ProcessRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The plan command implementation.
pub struct PlanCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
    args: PlanArgs,
}

impl PlanCommand {
    pub fn new(project_root: &Path, config: Option<&Path>, args: PlanArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.map(Path::to_path_buf),
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
        let provider = ConvergenceProvider::new(state, runner, &installer);
        let planned = provider.plan(self.args.action)?;

        if self.args.json {
            let value = serde_json::json!({
                "action": self.args.action,
                "command": planned.command,
                "argv": planned.command.argv(),
                "manifest": planned.manifest,
                "cwd": planned.options.cwd,
                "user": planned.options.user,
                "env": planned.options.env,
            });
            let json = serde_json::to_string_pretty(&value).map_err(anyhow::Error::from)?;
            println!("{}", json);
            return Ok(CommandResult::success());
        }

        match &planned.manifest {
            Some(path) => println!("{}={}", BUNDLE_GEMFILE, path.display()),
            None => ui.warning("No Gemfile found; bundler would use its own lookup"),
        }
        println!("{}", planned.command);

        Ok(CommandResult::success())
    }
}

impl Command for PlanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.run_with(ui, &SystemRunner)
    }
}
