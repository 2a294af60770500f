//! Bundle command construction.
//!
//! [`plan`] is a pure function of its inputs: the same action, state and
//! bundle binary always produce the same argument vector.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::desired::{Action, BinstubsMode, DesiredState};

/// Name of bundler's executable inside the gem executable directory.
pub const BUNDLE_BINARY: &str = "bundle";

/// A planned invocation of the bundle tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandSpec {
    /// The full argument vector, program first.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.to_string_lossy().into_owned());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// Path to the bundle executable inside `executable_dir`.
pub fn bundle_binary(executable_dir: &Path) -> PathBuf {
    executable_dir.join(BUNDLE_BINARY)
}

/// Build the bundle command for `action`.
pub fn plan(action: Action, state: &DesiredState, bundle_binary: &Path) -> CommandSpec {
    let mut args = vec![action.subcommand().to_string()];

    match &state.binstubs {
        BinstubsMode::Off => {}
        BinstubsMode::On => args.push("--binstubs".to_string()),
        BinstubsMode::Dir(dir) => args.push(format!("--binstubs={}", dir)),
    }

    if let Some(dir) = state.vendor.dir() {
        args.push(format!("--path={}", dir));
    }

    if state.deployment {
        args.push("--deployment".to_string());
    }

    if let Some(jobs) = state.jobs {
        args.push(format!("--jobs={}", jobs));
    }

    if let Some(retry) = state.retry {
        args.push(format!("--retry={}", retry));
    }

    if !state.without.is_empty() {
        args.push("--without".to_string());
        args.extend(state.without.iter().cloned());
    }

    CommandSpec {
        program: bundle_binary.to_path_buf(),
        args,
    }
}
