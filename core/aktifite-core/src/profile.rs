//! Device-local profile cache (`profile-cache.json`).
//!
//! Holds the last hydrated profile so a session can show a name and avatar
//! before (or without) the remote profile fetch. The cache belongs to one
//! session subject; a cached profile for another user is ignored.

use std::path::{Path, PathBuf};

use crate::backend::Session;
use crate::error::{AktifiteError, Result};
use crate::storage::write_json;
use crate::types::UserProfile;

#[derive(Debug, Clone)]
pub struct ProfileCache {
    file_path: PathBuf,
}

impl ProfileCache {
    pub fn new(file_path: &Path) -> Self {
        ProfileCache {
            file_path: file_path.to_path_buf(),
        }
    }

    /// Returns the cached profile, or `None` when missing or unreadable.
    pub fn load(&self) -> Option<UserProfile> {
        let content = match fs_err::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read profile cache");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring corrupt profile cache");
                None
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        write_json(&self.file_path, profile)
    }

    pub fn clear(&self) -> Result<()> {
        match fs_err::remove_file(&self.file_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AktifiteError::Io {
                context: format!("removing {}", self.file_path.display()),
                source: err,
            }),
        }
    }

    /// Starting profile for `session`: the cached one when it belongs to the
    /// same user, otherwise a blank profile carrying the session email.
    pub fn initial_profile(&self, session: &Session) -> UserProfile {
        match self.load() {
            Some(cached) if cached.id == session.user_id => cached,
            _ => {
                let mut profile = UserProfile::new(session.user_id.clone());
                profile.email = session.email.clone();
                profile
            }
        }
    }
}
