//! Desired-state model for a bundle.
//!
//! A [`DesiredState`] is fully concrete: every default has already been
//! resolved by [`crate::config::resolve_defaults`], so nothing downstream
//! consults the environment to fill in a missing value.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Bundle action requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Install gems from the Gemfile (and lockfile, if present).
    Install,
    /// Update gems to the newest versions the Gemfile allows.
    Update,
}

impl Action {
    /// The bundle subcommand for this action.
    pub fn subcommand(&self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Update => "update",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

/// Binstubs generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum BinstubsMode {
    #[default]
    Off,
    /// Generate binstubs in bundler's default location.
    On,
    /// Generate binstubs in the given directory.
    Dir(String),
}

/// Where gems get installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum VendorMode {
    #[default]
    Off,
    /// Install into `vendor/bundle`.
    On,
    /// Install into the given directory.
    Dir(String),
}

impl VendorMode {
    /// Directory passed to bundler when vendoring without a custom path.
    pub const DEFAULT_DIR: &'static str = "vendor/bundle";

    /// The install directory, if vendoring is enabled.
    pub fn dir(&self) -> Option<&str> {
        match self {
            VendorMode::Off => None,
            VendorMode::On => Some(Self::DEFAULT_DIR),
            VendorMode::Dir(dir) => Some(dir.as_str()),
        }
    }
}

/// Fully resolved attributes of one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredState {
    /// Gemfile, or a directory to search upward from. Absolute and existing.
    pub path: PathBuf,
    pub binstubs: BinstubsMode,
    /// Exact bundler version to pin. `None` upgrades to the latest release.
    pub bundler_version: Option<String>,
    pub deployment: bool,
    /// The `gem` executable used to bootstrap bundler.
    pub gem_binary: PathBuf,
    pub jobs: Option<u32>,
    pub retry: Option<u32>,
    /// Account the bundle command runs as.
    pub user: Option<String>,
    pub vendor: VendorMode,
    /// Groups to skip, in caller order.
    pub without: Vec<String>,
}

impl DesiredState {
    /// Create a state with every optional attribute at its default.
    pub fn new(path: impl Into<PathBuf>, gem_binary: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            binstubs: BinstubsMode::Off,
            bundler_version: None,
            deployment: false,
            gem_binary: gem_binary.into(),
            jobs: None,
            retry: None,
            user: None,
            vendor: VendorMode::Off,
            without: Vec::new(),
        }
    }
}
