//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, GemsyncTheme, OutputMode, UserInterface};

/// Terminal UI implementation.
///
/// Status goes to stdout; errors go to stderr in every mode.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: GemsyncTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            GemsyncTheme::new()
        } else {
            GemsyncTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_command(&mut self, cmd: &str) {
        if self.mode.shows_command_output() {
            writeln!(self.out, "{}", self.theme.format_command(cmd)).ok();
        }
    }

    fn show_output(&mut self, output: &str) {
        if self.mode.shows_command_output() && !output.is_empty() {
            write!(self.out, "{}", self.theme.dim.apply_to(output)).ok();
            if !output.ends_with('\n') {
                writeln!(self.out).ok();
            }
        }
    }
}
