//! Storage configuration and path management for Aktifite.
//!
//! `StorageConfig` is the single place that decides where the local variant
//! keeps its files. Production code uses `StorageConfig::default()` which
//! points to `~/.aktifite/` (or `$AKTIFITE_HOME` when set). Tests use
//! `StorageConfig::with_root(temp_dir)` for isolation.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{AktifiteError, Result};

/// Environment variable that overrides the storage root.
pub const HOME_ENV_VAR: &str = "AKTIFITE_HOME";

/// Central configuration for all Aktifite storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        if let Some(root) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
            return Self {
                root: PathBuf::from(root),
            };
        }
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            root: home.join(".aktifite"),
        }
    }
}

impl StorageConfig {
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Files
    // ─────────────────────────────────────────────────────────────────────────────

    /// Path to state.json (roster, notifications and threads snapshot).
    pub fn state_file(&self) -> PathBuf {
        self.root.join("state.json")
    }

    /// Path to activities.json (file-backed activity store rows).
    pub fn activities_file(&self) -> PathBuf {
        self.root.join("activities.json")
    }

    /// Path to profiles.json (file-backed profile store rows).
    pub fn profiles_file(&self) -> PathBuf {
        self.root.join("profiles.json")
    }

    /// Path to profile-cache.json (last hydrated profile snapshot).
    pub fn profile_cache_file(&self) -> PathBuf {
        self.root.join("profile-cache.json")
    }

    /// Path to config.json (app preferences).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Ensures the root directory and standard subdirectories exist.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.root.clone(), self.logs_dir()] {
            fs_err::create_dir_all(&dir).map_err(|e| AktifiteError::Io {
                context: format!("creating {}", dir.display()),
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Writes content to a file atomically using temp file + rename.
///
/// The rename is atomic on the same filesystem, so readers never observe a
/// half-written file.
pub(crate) fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| AktifiteError::InvalidStoragePath(path.to_path_buf()))?;

    fs_err::create_dir_all(dir).map_err(|e| AktifiteError::Io {
        context: format!("creating directory {}", dir.display()),
        source: e,
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AktifiteError::Io {
        context: format!("creating temp file in {}", dir.display()),
        source: e,
    })?;

    tmp.write_all(contents.as_bytes())
        .map_err(|e| AktifiteError::Io {
            context: format!("writing temp file for {}", path.display()),
            source: e,
        })?;

    tmp.flush().map_err(|e| AktifiteError::Io {
        context: format!("flushing temp file for {}", path.display()),
        source: e,
    })?;

    tmp.persist(path).map_err(|e| AktifiteError::Io {
        context: format!("persisting temp file to {}", path.display()),
        source: e.error,
    })?;

    Ok(())
}

/// Serializes `value` as pretty JSON and writes it atomically.
pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| AktifiteError::Json {
        context: format!("serializing {}", path.display()),
        source: e,
    })?;
    atomic_write(path, &content)
}
