//! Backing-storage existence checks.
//!
//! A world's storage is the directory named after it under the configured
//! root. The probe is a pure read: it mutates nothing, a missing path is an
//! ordinary `false` rather than an error, and the engine never creates what
//! it does not find.

use std::env;
use std::path::{Path, PathBuf};

/// Root-relative existence probe for world storage.
#[derive(Clone, Debug)]
pub struct WorldStore {
    root: PathBuf,
}

impl WorldStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether storage for `world` exists. Case-sensitive, exact match to
    /// the on-disk directory name; a plain file with that name is not a
    /// world.
    pub fn exists(&self, world: &str) -> bool {
        self.root.join(world).is_dir()
    }
}

/// Resolve the storage root from `WORLDKEEPER_ROOT`, falling back to
/// `default` when the variable is unset or empty.
pub fn storage_root_from_env(default: impl Into<PathBuf>) -> PathBuf {
    match env::var_os("WORLDKEEPER_ROOT") {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => default.into(),
    }
}
