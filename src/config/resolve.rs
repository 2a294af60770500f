//! Default resolution.
//!
//! Turns a partial [`BundleConfig`] into a concrete [`DesiredState`]. This
//! runs exactly once, before convergence starts, and is the only place that
//! looks at the parent `ruby` section or searches `PATH`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::loader::load_config;
use crate::config::schema::{BundleConfig, DirToggle};
use crate::desired::{BinstubsMode, DesiredState, VendorMode};
use crate::error::{GemsyncError, Result};

/// Executable used to bootstrap bundler when none is configured.
pub const DEFAULT_GEM_BINARY: &str = "gem";

/// Inputs defaults are resolved from.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// Directory relative paths are resolved against.
    pub base_dir: PathBuf,

    /// `gem` executable configured on the parent `ruby` section.
    pub parent_gem_binary: Option<PathBuf>,
}

/// Load the project's config, overlay `overrides`, and resolve defaults.
pub fn load_desired_state(
    project_root: &Path,
    config_override: Option<&Path>,
    overrides: BundleConfig,
) -> Result<DesiredState> {
    let loaded = load_config(project_root, config_override)?;
    let bundle = loaded.config.bundle.merge(overrides);
    let ctx = ResolveContext {
        base_dir: loaded.base_dir,
        parent_gem_binary: loaded.config.ruby.gem_binary,
    };
    resolve_defaults(&bundle, &ctx)
}

/// Resolve defaults, looking executables up on `PATH`.
pub fn resolve_defaults(bundle: &BundleConfig, ctx: &ResolveContext) -> Result<DesiredState> {
    resolve_defaults_with(bundle, ctx, &|name| which::which(name).ok())
}

/// Resolve defaults with an explicit executable lookup.
pub fn resolve_defaults_with(
    bundle: &BundleConfig,
    ctx: &ResolveContext,
    find_executable: &dyn Fn(&str) -> Option<PathBuf>,
) -> Result<DesiredState> {
    let path = match &bundle.path {
        Some(p) => ctx.base_dir.join(p),
        None => ctx.base_dir.clone(),
    };
    let path = std::path::absolute(path)?;
    if !path.exists() {
        return Err(GemsyncError::PathNotFound { path });
    }

    let gem_binary = resolve_gem_binary(bundle, ctx, find_executable)?;

    if let Some(version) = &bundle.bundler_version {
        if version.trim().is_empty() {
            return Err(invalid("bundler_version must not be empty"));
        }
    }

    Ok(DesiredState {
        path,
        binstubs: match dir_toggle(bundle.binstubs.as_ref(), "binstubs")? {
            Toggle::Off => BinstubsMode::Off,
            Toggle::On => BinstubsMode::On,
            Toggle::Dir(dir) => BinstubsMode::Dir(dir),
        },
        bundler_version: bundle.bundler_version.clone(),
        deployment: bundle.deployment.unwrap_or(false),
        gem_binary,
        jobs: positive(bundle.jobs, "jobs")?,
        retry: positive(bundle.retry, "retry")?,
        user: match &bundle.user {
            Some(user) if user.trim().is_empty() => return Err(invalid("user must not be empty")),
            other => other.clone(),
        },
        vendor: match dir_toggle(bundle.vendor.as_ref(), "vendor")? {
            Toggle::Off => VendorMode::Off,
            Toggle::On => VendorMode::On,
            Toggle::Dir(dir) => VendorMode::Dir(dir),
        },
        without: groups(bundle.without.as_deref().unwrap_or_default())?,
    })
}

fn resolve_gem_binary(
    bundle: &BundleConfig,
    ctx: &ResolveContext,
    find_executable: &dyn Fn(&str) -> Option<PathBuf>,
) -> Result<PathBuf> {
    let configured = bundle
        .gem_binary
        .as_ref()
        .or(ctx.parent_gem_binary.as_ref());

    match configured {
        Some(path) if is_bare_name(path) => {
            let name = path.to_string_lossy().into_owned();
            find_executable(name.as_str())
                .ok_or_else(|| invalid(&format!("'{}' not found on PATH", name)))
        }
        Some(path) => Ok(std::path::absolute(ctx.base_dir.join(path))?),
        None => find_executable(DEFAULT_GEM_BINARY).ok_or_else(|| {
            invalid("no gem binary configured and 'gem' not found on PATH; set bundle.gem_binary")
        }),
    }
}

fn is_bare_name(path: &Path) -> bool {
    path.components().count() == 1 && path.is_relative()
}

enum Toggle {
    Off,
    On,
    Dir(String),
}

fn dir_toggle(value: Option<&DirToggle>, field: &str) -> Result<Toggle> {
    match value {
        None | Some(DirToggle::Enabled(false)) => Ok(Toggle::Off),
        Some(DirToggle::Enabled(true)) => Ok(Toggle::On),
        Some(DirToggle::Dir(dir)) if dir.trim().is_empty() => {
            Err(invalid(&format!("{} directory must not be empty", field)))
        }
        Some(DirToggle::Dir(dir)) => Ok(Toggle::Dir(dir.clone())),
    }
}

fn positive(value: Option<u32>, field: &str) -> Result<Option<u32>> {
    match value {
        Some(0) => Err(invalid(&format!("{} must be at least 1", field))),
        other => Ok(other),
    }
}

/// Validate group names, dropping repeats but keeping first-seen order.
fn groups(names: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("without groups must not be empty"));
        }
        if seen.insert(name.to_string()) {
            out.push(name.to_string());
        }
    }

    Ok(out)
}

fn invalid(message: &str) -> GemsyncError {
    GemsyncError::ConfigValidationError {
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ctx(temp: &TempDir) -> ResolveContext {
        ResolveContext {
            base_dir: temp.path().to_path_buf(),
            parent_gem_binary: None,
        }
    }

    fn on_path(name: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/bin").join(name))
    }

    fn nowhere(_: &str) -> Option<PathBuf> {
        None
    }

    #[test]
    fn defaults_for_empty_config() {
        let temp = TempDir::new().unwrap();
        let state = resolve_defaults_with(&BundleConfig::default(), &ctx(&temp), &on_path).unwrap();

        assert_eq!(state.path, temp.path());
        assert_eq!(state.gem_binary, PathBuf::from("/usr/bin/gem"));
        assert_eq!(state.binstubs, BinstubsMode::Off);
        assert_eq!(state.vendor, VendorMode::Off);
        assert!(!state.deployment);
        assert!(state.jobs.is_none());
        assert!(state.without.is_empty());
    }

    #[test]
    fn relative_path_resolves_against_base_dir() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("app")).unwrap();
        let bundle = BundleConfig {
            path: Some(PathBuf::from("app")),
            ..Default::default()
        };

        let state = resolve_defaults_with(&bundle, &ctx(&temp), &on_path).unwrap();
        assert_eq!(state.path, temp.path().join("app"));
    }

    #[test]
    fn missing_path_fails_fast() {
        let temp = TempDir::new().unwrap();
        let bundle = BundleConfig {
            path: Some(PathBuf::from("nope")),
            ..Default::default()
        };

        let err = resolve_defaults_with(&bundle, &ctx(&temp), &on_path).unwrap_err();
        assert!(matches!(err, GemsyncError::PathNotFound { .. }));
    }

    #[test]
    fn gem_binary_inherits_from_parent() {
        let temp = TempDir::new().unwrap();
        let mut context = ctx(&temp);
        context.parent_gem_binary = Some(PathBuf::from("/opt/ruby/bin/gem"));

        let state = resolve_defaults_with(&BundleConfig::default(), &context, &nowhere).unwrap();
        assert_eq!(state.gem_binary, PathBuf::from("/opt/ruby/bin/gem"));
    }

    #[test]
    fn explicit_gem_binary_beats_parent() {
        let temp = TempDir::new().unwrap();
        let mut context = ctx(&temp);
        context.parent_gem_binary = Some(PathBuf::from("/opt/ruby/bin/gem"));
        let bundle = BundleConfig {
            gem_binary: Some(PathBuf::from("/usr/local/bin/gem")),
            ..Default::default()
        };

        let state = resolve_defaults_with(&bundle, &context, &nowhere).unwrap();
        assert_eq!(state.gem_binary, PathBuf::from("/usr/local/bin/gem"));
    }

    #[test]
    fn bare_gem_binary_is_looked_up() {
        let temp = TempDir::new().unwrap();
        let bundle = BundleConfig {
            gem_binary: Some(PathBuf::from("gem3.2")),
            ..Default::default()
        };

        let state = resolve_defaults_with(&bundle, &ctx(&temp), &on_path).unwrap();
        assert_eq!(state.gem_binary, PathBuf::from("/usr/bin/gem3.2"));
    }

    #[test]
    fn no_gem_binary_anywhere_is_invalid() {
        let temp = TempDir::new().unwrap();
        let err =
            resolve_defaults_with(&BundleConfig::default(), &ctx(&temp), &nowhere).unwrap_err();
        assert!(matches!(err, GemsyncError::ConfigValidationError { .. }));
    }

    #[test]
    fn toggles_map_to_modes() {
        let temp = TempDir::new().unwrap();
        let bundle = BundleConfig {
            binstubs: Some(DirToggle::Dir("bin/stubs".into())),
            vendor: Some(DirToggle::Enabled(true)),
            ..Default::default()
        };

        let state = resolve_defaults_with(&bundle, &ctx(&temp), &on_path).unwrap();
        assert_eq!(state.binstubs, BinstubsMode::Dir("bin/stubs".into()));
        assert_eq!(state.vendor, VendorMode::On);
    }

    #[test]
    fn false_toggle_is_off() {
        let temp = TempDir::new().unwrap();
        let bundle = BundleConfig {
            vendor: Some(DirToggle::Enabled(false)),
            ..Default::default()
        };

        let state = resolve_defaults_with(&bundle, &ctx(&temp), &on_path).unwrap();
        assert_eq!(state.vendor, VendorMode::Off);
    }

    #[test]
    fn zero_jobs_is_invalid() {
        let temp = TempDir::new().unwrap();
        let bundle = BundleConfig {
            jobs: Some(0),
            ..Default::default()
        };

        let err = resolve_defaults_with(&bundle, &ctx(&temp), &on_path).unwrap_err();
        assert!(err.to_string().contains("jobs"));
    }

    #[test]
    fn empty_vendor_dir_is_invalid() {
        let temp = TempDir::new().unwrap();
        let bundle = BundleConfig {
            vendor: Some(DirToggle::Dir("  ".into())),
            ..Default::default()
        };

        assert!(resolve_defaults_with(&bundle, &ctx(&temp), &on_path).is_err());
    }

    #[test]
    fn without_keeps_first_occurrence_order() {
        let temp = TempDir::new().unwrap();
        let bundle = BundleConfig {
            without: Some(vec![
                "test".into(),
                "development".into(),
                "test".into(),
            ]),
            ..Default::default()
        };

        let state = resolve_defaults_with(&bundle, &ctx(&temp), &on_path).unwrap();
        assert_eq!(state.without, vec!["test", "development"]);
    }

    #[test]
    fn load_desired_state_overlays_cli_values() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("app")).unwrap();
        fs::write(
            temp.path().join(".gemsync.yml"),
            "ruby:\n  gem_binary: /opt/ruby/bin/gem\nbundle:\n  path: app\n  jobs: 2\n  deployment: true\n",
        )
        .unwrap();
        let overrides = BundleConfig {
            jobs: Some(6),
            ..Default::default()
        };

        let state = load_desired_state(temp.path(), None, overrides).unwrap();
        assert_eq!(state.path, temp.path().join("app"));
        assert_eq!(state.jobs, Some(6));
        assert!(state.deployment);
        assert_eq!(state.gem_binary, PathBuf::from("/opt/ruby/bin/gem"));
    }

    #[test]
    fn cli_can_turn_config_deployment_off() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".gemsync.yml"),
            "ruby:\n  gem_binary: /opt/ruby/bin/gem\nbundle:\n  deployment: true\n",
        )
        .unwrap();
        let overrides = BundleConfig {
            deployment: Some(false),
            ..Default::default()
        };

        let state = load_desired_state(temp.path(), None, overrides).unwrap();
        assert!(!state.deployment);
    }

    #[test]
    fn empty_group_name_is_invalid() {
        let temp = TempDir::new().unwrap();
        let bundle = BundleConfig {
            without: Some(vec!["".into()]),
            ..Default::default()
        };

        assert!(resolve_defaults_with(&bundle, &ctx(&temp), &on_path).is_err());
    }
}
