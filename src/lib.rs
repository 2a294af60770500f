//! gemsync - Converge a Ruby bundle to its Gemfile.
//!
//! gemsync makes sure bundler is installed, finds the Gemfile bundler should
//! use, runs `bundle install` or `bundle update`, and reports whether any
//! gems changed.
//!
//! # Modules
//!
//! - [`bootstrap`] - Installing and locating the bundler gem
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading and default resolution
//! - [`desired`] - Fully resolved bundle attributes
//! - [`error`] - Error types and result aliases
//! - [`manifest`] - Gemfile lookup
//! - [`output`] - Parsing RubyGems and bundler output
//! - [`planner`] - Bundle command construction
//! - [`provider`] - The convergence state machine
//! - [`shell`] - Process execution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use gemsync::desired::{Action, DesiredState};
//! use gemsync::planner::plan;
//! use std::path::{Path, PathBuf};
//!
//! let mut state = DesiredState::new(PathBuf::from("/srv/app"), PathBuf::from("/usr/bin/gem"));
//! state.jobs = Some(4);
//!
//! let command = plan(Action::Install, &state, Path::new("/usr/local/bin/bundle"));
//! assert_eq!(command.to_string(), "/usr/local/bin/bundle install --jobs=4");
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod desired;
pub mod error;
pub mod manifest;
pub mod output;
pub mod planner;
pub mod provider;
pub mod shell;
pub mod ui;

pub use error::{GemsyncError, Result};
