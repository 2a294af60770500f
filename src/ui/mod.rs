//! User-facing output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for terminal usage
//! - [`MockUI`] for asserting on output in tests
//!
//! # Example
//!
//! ```
//! use gemsync::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.success("Bundle unchanged");
//! assert_eq!(ui.successes(), ["Bundle unchanged"]);
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, GemsyncTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a command about to run (verbose only).
    fn show_command(&mut self, cmd: &str);

    /// Show captured command output (verbose only).
    fn show_output(&mut self, output: &str);
}
