//! External command execution.
//!
//! Commands are spawned directly from an argument vector; no shell sits in
//! between, so arguments are never re-split or expanded.

use crate::error::{GemsyncError, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Turn an unsuccessful result into [`GemsyncError::CommandFailed`].
    pub fn into_checked(self, argv: &[String]) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(GemsyncError::CommandFailed {
                command: display_command(argv),
                code: self.exit_code,
                stdout: self.stdout,
                stderr: self.stderr,
            })
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Run as this account instead of the current one.
    pub user: Option<String>,
}

/// Spawns external processes.
pub trait ProcessRunner {
    /// Run `argv` to completion, capturing stdout and stderr.
    ///
    /// A nonzero exit is reported through [`CommandResult::success`], not as
    /// an error. Errors mean the process could not be run at all.
    fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult>;
}

/// [`ProcessRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
        execute(argv, options)
    }
}

/// Execute a command, blocking until it exits.
pub fn execute(argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let (program, args) = argv.split_first().ok_or_else(|| GemsyncError::CommandFailed {
        command: String::new(),
        code: None,
        stdout: String::new(),
        stderr: "empty command".to_string(),
    })?;

    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    // Set working directory
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    if let Some(user) = &options.user {
        let account = super::user::lookup(user)?;
        super::user::apply(&mut cmd, &account);
    }

    // Set environment
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Executing: {}", display_command(argv));

    let output = cmd.output().map_err(|e| GemsyncError::CommandFailed {
        command: display_command(argv),
        code: None,
        stdout: String::new(),
        stderr: e.to_string(),
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Render an argument vector for messages.
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("'{}'", arg)
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
