//! File-backed stores for the local variant: activity rows in
//! `activities.json`, profile rows in `profiles.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ActivityRecord, ActivityStore, NewActivityRecord, ProfileRecord, ProfileStore};
use crate::error::{AktifiteError, Result};
use crate::storage::write_json;
use crate::types::UserId;

const ACTIVITIES_FILE_VERSION: u32 = 1;
const PROFILES_FILE_VERSION: u32 = 1;

/// Reads a versioned store file. A missing or blank file is `None`.
fn read_versioned<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs_err::read_to_string(path).map_err(|e| AktifiteError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| AktifiteError::Json {
            context: format!("parsing {}", path.display()),
            source: e,
        })
}

#[derive(Debug, Serialize, Deserialize)]
struct ActivitiesFile {
    version: u32,
    #[serde(default)]
    activities: Vec<ActivityRecord>,
}

impl Default for ActivitiesFile {
    fn default() -> Self {
        ActivitiesFile {
            version: ACTIVITIES_FILE_VERSION,
            activities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonActivityStore {
    file_path: PathBuf,
}

impl JsonActivityStore {
    pub fn new(file_path: &Path) -> Self {
        JsonActivityStore {
            file_path: file_path.to_path_buf(),
        }
    }

    fn read_file(&self) -> Result<ActivitiesFile> {
        let Some(file) = read_versioned::<ActivitiesFile>(&self.file_path)? else {
            return Ok(ActivitiesFile::default());
        };
        if file.version != ACTIVITIES_FILE_VERSION {
            return Err(AktifiteError::backend(
                "list activities",
                format!("unsupported activities file version {}", file.version),
            ));
        }
        Ok(file)
    }
}

impl ActivityStore for JsonActivityStore {
    fn list_activities(&self) -> Result<Vec<ActivityRecord>> {
        let mut rows = self.read_file()?.activities;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn insert_activity(&self, record: NewActivityRecord) -> Result<ActivityRecord> {
        let mut file = self.read_file()?;
        let row = ActivityRecord::from_new(ulid::Ulid::new().to_string(), record, Utc::now());
        file.activities.push(row.clone());
        write_json(&self.file_path, &file)?;
        tracing::debug!(id = %row.id, path = %self.file_path.display(), "Activity row stored");
        Ok(row)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfilesFile {
    version: u32,
    #[serde(default)]
    profiles: BTreeMap<String, ProfileRecord>,
}

impl Default for ProfilesFile {
    fn default() -> Self {
        ProfilesFile {
            version: PROFILES_FILE_VERSION,
            profiles: BTreeMap::new(),
        }
    }
}

/// Profile rows keyed by user id, so every local user keeps their own name.
#[derive(Debug, Clone)]
pub struct JsonProfileStore {
    file_path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(file_path: &Path) -> Self {
        JsonProfileStore {
            file_path: file_path.to_path_buf(),
        }
    }

    fn read_file(&self, operation: &str) -> Result<ProfilesFile> {
        let Some(file) = read_versioned::<ProfilesFile>(&self.file_path)? else {
            return Ok(ProfilesFile::default());
        };
        if file.version != PROFILES_FILE_VERSION {
            return Err(AktifiteError::backend(
                operation,
                format!("unsupported profiles file version {}", file.version),
            ));
        }
        Ok(file)
    }
}

impl ProfileStore for JsonProfileStore {
    fn fetch_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>> {
        Ok(self
            .read_file("fetch profile")?
            .profiles
            .remove(user_id.as_str()))
    }

    fn upsert_profile(&self, record: &ProfileRecord) -> Result<()> {
        let mut file = self.read_file("upsert profile")?;
        file.profiles.insert(record.id.clone(), record.clone());
        write_json(&self.file_path, &file)?;
        tracing::debug!(id = %record.id, path = %self.file_path.display(), "Profile row stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_row(title: &str) -> NewActivityRecord {
        NewActivityRecord {
            organizer_id: "org".to_string(),
            sport_type: "Koşu".to_string(),
            title: title.to_string(),
            description: Some("Sahil boyunca".to_string()),
            date: "2025-02-10".to_string(),
            time: "07:30".to_string(),
            city: "İzmir".to_string(),
            location: "Kordon".to_string(),
            max_participants: 6,
        }
    }

    #[test]
    fn test_missing_file_lists_nothing() {
        let temp = TempDir::new().unwrap();
        let store = JsonActivityStore::new(&temp.path().join("activities.json"));
        assert!(store.list_activities().unwrap().is_empty());
    }

    #[test]
    fn test_inserted_rows_persist_across_instances() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("activities.json");
        let inserted = JsonActivityStore::new(&path)
            .insert_activity(new_row("Sabah Koşusu"))
            .unwrap();

        let rows = JsonActivityStore::new(&path).list_activities().unwrap();
        assert_eq!(rows, vec![inserted]);
    }

    #[test]
    fn test_list_is_creation_descending() {
        let temp = TempDir::new().unwrap();
        let store = JsonActivityStore::new(&temp.path().join("activities.json"));
        let first = store.insert_activity(new_row("ilk")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = store.insert_activity(new_row("ikinci")).unwrap();

        let ids: Vec<_> = store
            .list_activities()
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("activities.json");
        std::fs::write(&path, "[[[").unwrap();
        assert!(matches!(
            JsonActivityStore::new(&path).list_activities(),
            Err(AktifiteError::Json { .. })
        ));
    }

    #[test]
    fn test_profiles_are_kept_per_user() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("profiles.json");
        let store = JsonProfileStore::new(&path);
        assert_eq!(store.fetch_profile(&UserId::from("ali")).unwrap(), None);

        let ali = ProfileRecord {
            id: "ali".to_string(),
            full_name: Some("Ali Demir".to_string()),
            ..ProfileRecord::default()
        };
        let ayse = ProfileRecord {
            id: "ayse".to_string(),
            full_name: Some("Ayşe Kaya".to_string()),
            ..ProfileRecord::default()
        };
        store.upsert_profile(&ali).unwrap();
        store.upsert_profile(&ayse).unwrap();

        let reopened = JsonProfileStore::new(&path);
        assert_eq!(reopened.fetch_profile(&UserId::from("ali")).unwrap(), Some(ali));
        assert_eq!(reopened.fetch_profile(&UserId::from("ayse")).unwrap(), Some(ayse));
    }

    #[test]
    fn test_upsert_replaces_existing_profile() {
        let temp = TempDir::new().unwrap();
        let store = JsonProfileStore::new(&temp.path().join("profiles.json"));
        let mut record = ProfileRecord {
            id: "ali".to_string(),
            full_name: Some("Ali".to_string()),
            ..ProfileRecord::default()
        };
        store.upsert_profile(&record).unwrap();
        record.full_name = Some("Ali Demir".to_string());
        store.upsert_profile(&record).unwrap();

        let fetched = store.fetch_profile(&UserId::from("ali")).unwrap().unwrap();
        assert_eq!(fetched.full_name.as_deref(), Some("Ali Demir"));
    }
}
