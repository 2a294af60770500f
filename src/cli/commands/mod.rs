//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`].

pub mod converge;
pub mod dispatcher;
pub mod locate;
pub mod plan;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
