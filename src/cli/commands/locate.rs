//! `gemsync locate`: print the Gemfile bundler would use.

use std::path::{Path, PathBuf};

use crate::cli::args::LocateArgs;
use crate::config::load_config;
use crate::error::{GemsyncError, Result};
use crate::manifest::resolve_manifest_path;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The locate command implementation.
pub struct LocateCommand {
    project_root: PathBuf,
    config: Option<PathBuf>,
    args: LocateArgs,
}

impl LocateCommand {
    pub fn new(project_root: &Path, config: Option<&Path>, args: LocateArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config: config.map(Path::to_path_buf),
            args,
        }
    }

    /// Where to start looking: the argument, else the configured bundle
    /// path, else the config directory.
    fn start(&self) -> Result<PathBuf> {
        if let Some(path) = &self.args.path {
            return Ok(std::path::absolute(self.project_root.join(path))?);
        }

        let loaded = load_config(&self.project_root, self.config.as_deref())?;
        let start = match &loaded.config.bundle.path {
            Some(path) => loaded.base_dir.join(path),
            None => loaded.base_dir,
        };
        Ok(std::path::absolute(start)?)
    }

    /// Resolve the Gemfile without printing it.
    pub fn locate(&self) -> Result<PathBuf> {
        let start = self.start()?;
        resolve_manifest_path(&start)?.ok_or(GemsyncError::ManifestNotFound { start })
    }
}

impl Command for LocateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.locate() {
            Ok(manifest) => {
                println!("{}", manifest.display());
                Ok(CommandResult::success())
            }
            Err(e @ GemsyncError::ManifestNotFound { .. }) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
            Err(e) => Err(e),
        }
    }
}
