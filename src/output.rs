//! Parsing of RubyGems and bundler process output.
//!
//! Both formats are owned by the external tools, not by us, so the parsers
//! match them literally:
//!
//! - `gem environment` reports the gem binary directory on a line of the form
//!   `  - EXECUTABLE DIRECTORY: /usr/local/bin`
//! - `bundle install`/`bundle update` print `Installing <gem> <version>` for
//!   every gem they actually install. Any occurrence of the substring
//!   `Installing` in stdout means the bundle changed.

use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Marker bundler prints for each gem it installs.
pub const CHANGE_MARKER: &str = "Installing";

static EXECUTABLE_DIRECTORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)EXECUTABLE DIRECTORY: (.+?)\s*$").expect("valid regex"));

/// Whether an action changed the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeVerdict {
    Changed,
    Unchanged,
}

impl ChangeVerdict {
    pub fn is_changed(&self) -> bool {
        matches!(self, ChangeVerdict::Changed)
    }
}

/// Extract the executable directory from `gem environment` output.
///
/// Returns the first match; `None` when the line is absent.
pub fn parse_executable_directory(output: &str) -> Option<PathBuf> {
    EXECUTABLE_DIRECTORY
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| PathBuf::from(m.as_str()))
}

/// Classify bundler stdout.
pub fn classify_output(stdout: &str) -> ChangeVerdict {
    if stdout.contains(CHANGE_MARKER) {
        ChangeVerdict::Changed
    } else {
        ChangeVerdict::Unchanged
    }
}
