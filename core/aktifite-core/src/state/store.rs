//! Snapshot persistence for [`AppState`].
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "state": { "roster": { ... }, "notifications": { ... }, "conversations": { ... } }
//! }
//! ```
//!
//! # Defensive Loading
//!
//! - Missing file: empty state
//! - Empty file: empty state, warning logged
//! - Corrupt JSON or unsupported version: empty state, warning logged
//!
//! Saves go through temp file + rename so a crash never leaves half a file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::{AktifiteError, Result};
use crate::storage::write_json;

pub const STATE_FILE_VERSION: u32 = 1;

#[derive(Serialize)]
struct StateFileRef<'a> {
    version: u32,
    state: &'a AppState,
}

#[derive(Deserialize)]
struct StateFile {
    version: u32,
    #[serde(default)]
    state: AppState,
}

/// Reads and writes the `state.json` snapshot.
#[derive(Debug, Clone)]
pub struct AppStateStore {
    file_path: PathBuf,
}

impl AppStateStore {
    pub fn new(file_path: &Path) -> Self {
        AppStateStore {
            file_path: file_path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Loads the snapshot. Only unreadable files are errors; anything that
    /// reads but does not decode yields an empty state.
    pub fn load(&self) -> Result<AppState> {
        if !self.file_path.exists() {
            return Ok(AppState::new());
        }

        let content =
            fs_err::read_to_string(&self.file_path).map_err(|e| AktifiteError::Io {
                context: format!("reading {}", self.file_path.display()),
                source: e,
            })?;

        if content.trim().is_empty() {
            tracing::warn!(path = %self.file_path.display(), "Empty state file, starting fresh");
            return Ok(AppState::new());
        }

        match serde_json::from_str::<StateFile>(&content) {
            Ok(file) if file.version == STATE_FILE_VERSION => Ok(file.state),
            Ok(file) => {
                tracing::warn!(
                    version = file.version,
                    expected = STATE_FILE_VERSION,
                    "Unsupported state file version, starting fresh"
                );
                Ok(AppState::new())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to parse state file, starting fresh");
                Ok(AppState::new())
            }
        }
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        write_json(
            &self.file_path,
            &StateFileRef {
                version: STATE_FILE_VERSION,
                state,
            },
        )
    }
}
