//! Configuration loading and default resolution for gemsync.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Default resolution and validation in [`resolve`]
//!
//! # Example
//!
//! ```
//! use gemsync::config::{load_config, resolve_defaults_with, ResolveContext};
//! use std::path::PathBuf;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join(".gemsync.yml"),
//!     "ruby:\n  gem_binary: /opt/ruby/bin/gem\nbundle:\n  jobs: 4\n",
//! )
//! .unwrap();
//!
//! let loaded = load_config(temp.path(), None).unwrap();
//! let ctx = ResolveContext {
//!     base_dir: loaded.base_dir.clone(),
//!     parent_gem_binary: loaded.config.ruby.gem_binary.clone(),
//! };
//! let state = resolve_defaults_with(&loaded.config.bundle, &ctx, &|_| None).unwrap();
//!
//! assert_eq!(state.jobs, Some(4));
//! assert_eq!(state.gem_binary, PathBuf::from("/opt/ruby/bin/gem"));
//! ```

pub mod loader;
pub mod resolve;
pub mod schema;

pub use loader::{
    discover_config, load_config, load_config_file, parse_config, LoadedConfig, CONFIG_FILE_NAME,
};
pub use resolve::{
    load_desired_state, resolve_defaults, resolve_defaults_with, ResolveContext,
    DEFAULT_GEM_BINARY,
};
pub use schema::{BundleConfig, DirToggle, GemsyncConfig, RubyConfig};
