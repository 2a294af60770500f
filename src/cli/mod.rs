//! Command-line interface for gemsync.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{BundleArgs, Cli, Commands, ConvergeArgs, LocateArgs, PlanArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
