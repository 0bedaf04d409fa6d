//! Profile persistence.
//!
//! The profile lives in a single TOML file under the Lexa home directory.
//! There is one writer (the current session), so a plain load-at-startup /
//! save-on-mutation scheme is enough.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::UserProfile;
use crate::config::paths;

/// Handle to the persisted profile file.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store at the default location (`${LEXA_HOME}/profile.toml`).
    pub fn new() -> Self {
        Self::at(paths::profile_path())
    }

    /// Store at a specific path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted profile.
    /// Returns the default profile if the file doesn't exist.
    pub fn load(&self) -> Result<UserProfile> {
        if self.path.exists() {
            let contents = fs::read_to_string(&self.path)
                .with_context(|| format!("Failed to read profile from {}", self.path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse profile from {}", self.path.display()))
        } else {
            Ok(UserProfile::default())
        }
    }

    /// Writes the profile atomically (temp file + rename), creating parent
    /// directories first.
    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            toml::to_string_pretty(profile).context("Failed to serialize profile to TOML")?;

        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write profile to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!("Failed to move profile into place at {}", self.path.display())
        })
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}
