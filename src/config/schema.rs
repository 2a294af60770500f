//! Configuration schema definitions for gemsync.
//!
//! This module contains the struct definitions that map to the
//! `.gemsync.yml` file format. Every field is optional so that a file, the
//! command line, or both can supply it; defaults are filled in later by
//! [`super::resolve_defaults`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `.gemsync.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GemsyncConfig {
    /// Shared Ruby settings other sections inherit from.
    pub ruby: RubyConfig,

    /// The bundle to converge.
    pub bundle: BundleConfig,
}

/// Ruby runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RubyConfig {
    /// `gem` executable inherited by the bundle when it sets none itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem_binary: Option<PathBuf>,
}

/// A flag that is either toggled or given a directory.
///
/// ```yaml
/// binstubs: true        # on, default location
/// binstubs: bin/stubs   # on, custom location
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirToggle {
    Enabled(bool),
    Dir(String),
}

/// Bundle attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Gemfile, or directory to search upward from (default: config dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Generate binstubs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binstubs: Option<DirToggle>,

    /// Exact bundler version (default: latest)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler_version: Option<String>,

    /// Install in deployment mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<bool>,

    /// `gem` executable (default: ruby.gem_binary, then PATH)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem_binary: Option<PathBuf>,

    /// Parallel install jobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<u32>,

    /// Network retries bundler performs itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<u32>,

    /// Run the bundle command as this user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Install gems into a project-local directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<DirToggle>,

    /// Groups to skip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without: Option<Vec<String>>,
}

impl BundleConfig {
    /// Overlay `overrides` on top of `self`, field by field.
    pub fn merge(self, overrides: BundleConfig) -> BundleConfig {
        BundleConfig {
            path: overrides.path.or(self.path),
            binstubs: overrides.binstubs.or(self.binstubs),
            bundler_version: overrides.bundler_version.or(self.bundler_version),
            deployment: overrides.deployment.or(self.deployment),
            gem_binary: overrides.gem_binary.or(self.gem_binary),
            jobs: overrides.jobs.or(self.jobs),
            retry: overrides.retry.or(self.retry),
            user: overrides.user.or(self.user),
            vendor: overrides.vendor.or(self.vendor),
            without: overrides.without.or(self.without),
        }
    }
}
