//! Mock process runner for testing.
//!
//! `MockRunner` implements [`ProcessRunner`] by replaying queued results in
//! order and recording every invocation for later assertion.
//!
//! # Example
//!
//! ```
//! use gemsync::shell::{CommandOptions, MockRunner, ProcessRunner};
//!
//! let runner = MockRunner::new();
//! runner.succeed("  - EXECUTABLE DIRECTORY: /usr/local/bin\n");
//!
//! let argv = vec!["gem".to_string(), "environment".to_string()];
//! let result = runner.run(&argv, &CommandOptions::default()).unwrap();
//!
//! assert!(result.success);
//! assert_eq!(runner.commands(), vec!["gem environment"]);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::error::{GemsyncError, Result};

use super::command::{display_command, CommandOptions, CommandResult, ProcessRunner};

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub argv: Vec<String>,
    pub options: CommandOptions,
}

/// Scripted [`ProcessRunner`].
///
/// Running out of queued results is reported as a spawn failure, so an
/// unexpected extra command shows up as an error instead of a panic.
#[derive(Debug, Default)]
pub struct MockRunner {
    results: RefCell<VecDeque<CommandResult>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result.
    pub fn respond(&self, result: CommandResult) -> &Self {
        self.results.borrow_mut().push_back(result);
        self
    }

    /// Queue a successful run with the given stdout.
    pub fn succeed(&self, stdout: &str) -> &Self {
        self.respond(CommandResult::success(
            stdout.to_string(),
            String::new(),
            Duration::ZERO,
        ))
    }

    /// Queue a failed run.
    pub fn fail(&self, code: i32, stdout: &str, stderr: &str) -> &Self {
        self.respond(CommandResult::failure(
            Some(code),
            stdout.to_string(),
            stderr.to_string(),
            Duration::ZERO,
        ))
    }

    /// Every invocation so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Every invocation so far, rendered as command lines.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| display_command(&call.argv))
            .collect()
    }

    /// Number of queued results not yet consumed.
    pub fn pending(&self) -> usize {
        self.results.borrow().len()
    }
}

impl ProcessRunner for MockRunner {
    fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
        self.calls.borrow_mut().push(RecordedCall {
            argv: argv.to_vec(),
            options: options.clone(),
        });

        self.results
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| GemsyncError::CommandFailed {
                command: display_command(argv),
                code: None,
                stdout: String::new(),
                stderr: "MockRunner: no result queued".to_string(),
            })
    }
}
