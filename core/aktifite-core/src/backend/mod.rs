//! Collaborator interfaces for the hosted backend and their record shapes.
//!
//! The core only talks to the hosted auth/row store through these traits.
//! Records use the stored column names (`sport_type`, `organizer_id`, ...);
//! mapping to domain types happens here and nowhere else.
//!
//! Implementations:
//! - [`memory`]: in-process stores for tests and embedding
//! - [`json_store`]: file-backed activity store for the local variant

pub mod json_store;
pub mod memory;

pub use json_store::{JsonActivityStore, JsonProfileStore};
pub use memory::{MemoryActivityStore, MemoryProfileStore, StaticSession};

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AktifiteError, Result};
use crate::roster::{Activity, ActivityDraft};
use crate::types::{ActivityId, City, Sport, UserId, UserProfile, UserSummary};

/// Display name for organizers hydrated from rows that carry only an id.
pub const UNKNOWN_ORGANIZER_NAME: &str = "Organizatör";

/// Floor for a hydrated row's cap: the organizer plus one more.
const MIN_ROW_PARTICIPANTS: u32 = 2;

// ═══════════════════════════════════════════════════════════════════════════════
// Traits
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    #[serde(default)]
    pub email: String,
}

/// Supplies the signed-in identity. `None` means "not authorized to act".
pub trait SessionProvider {
    fn current_session(&self) -> Option<Session>;

    fn sign_out(&self) {}
}

/// Hosted activity rows.
pub trait ActivityStore {
    /// All rows, newest `created_at` first.
    fn list_activities(&self) -> Result<Vec<ActivityRecord>>;

    /// Inserts one row and returns it with its assigned id.
    fn insert_activity(&self, record: NewActivityRecord) -> Result<ActivityRecord>;
}

/// Hosted profile rows keyed by session identity.
pub trait ProfileStore {
    fn fetch_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>>;

    fn upsert_profile(&self, record: &ProfileRecord) -> Result<()>;
}

impl<T: ActivityStore + ?Sized> ActivityStore for Arc<T> {
    fn list_activities(&self) -> Result<Vec<ActivityRecord>> {
        (**self).list_activities()
    }

    fn insert_activity(&self, record: NewActivityRecord) -> Result<ActivityRecord> {
        (**self).insert_activity(record)
    }
}

impl<T: ProfileStore + ?Sized> ProfileStore for Arc<T> {
    fn fetch_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>> {
        (**self).fetch_profile(user_id)
    }

    fn upsert_profile(&self, record: &ProfileRecord) -> Result<()> {
        (**self).upsert_profile(record)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Records
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivityRecord {
    pub organizer_id: String,
    pub sport_type: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    pub time: String,
    pub city: String,
    pub location: String,
    pub max_participants: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub organizer_id: String,
    pub sport_type: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    pub time: String,
    pub city: String,
    pub location: String,
    pub max_participants: u32,
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn from_new(id: String, record: NewActivityRecord, created_at: DateTime<Utc>) -> Self {
        ActivityRecord {
            id,
            organizer_id: record.organizer_id,
            sport_type: record.sport_type,
            title: record.title,
            description: record.description,
            date: record.date,
            time: record.time,
            city: record.city,
            location: record.location,
            max_participants: record.max_participants,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub favorite_sports: Option<Vec<String>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Mapping
// ═══════════════════════════════════════════════════════════════════════════════

pub fn new_record_from_draft(draft: &ActivityDraft, organizer: &UserId) -> NewActivityRecord {
    NewActivityRecord {
        organizer_id: organizer.to_string(),
        sport_type: draft.sport.label().to_string(),
        title: draft.title.clone(),
        description: Some(draft.description.clone()).filter(|d| !d.is_empty()),
        date: draft.date.format("%Y-%m-%d").to_string(),
        time: draft.time.format("%H:%M").to_string(),
        city: draft.city.label().to_string(),
        location: draft.location.clone(),
        max_participants: draft.max_participants,
    }
}

fn parse_record_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AktifiteError::backend("decode activity", format!("date {value:?}: {e}")))
}

fn parse_record_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| AktifiteError::backend("decode activity", format!("time {value:?}: {e}")))
}

/// Maps a stored row into a roster activity.
///
/// Rows only carry the organizer id, so the organizer is the sole participant
/// and request lists start empty. A cap below two is raised to two so the
/// organizer always fits. `organizer` replaces the placeholder summary
/// when the caller knows who the organizer is (e.g. the current user).
pub fn activity_from_record(
    record: ActivityRecord,
    organizer: Option<&UserSummary>,
) -> Result<Activity> {
    let creator = match organizer {
        Some(summary) if summary.id.as_str() == record.organizer_id => summary.clone(),
        _ => UserSummary::new(record.organizer_id.as_str(), UNKNOWN_ORGANIZER_NAME),
    };
    let draft = ActivityDraft {
        sport: record.sport_type.parse::<Sport>()?,
        title: record.title,
        description: record.description.unwrap_or_default(),
        date: parse_record_date(&record.date)?,
        time: parse_record_time(&record.time)?,
        location: record.location,
        city: record.city.parse::<City>()?,
        max_participants: record.max_participants.max(MIN_ROW_PARTICIPANTS),
    };
    Ok(Activity::from_draft(
        ActivityId::from(record.id),
        draft,
        creator,
        record.created_at,
    ))
}

impl ProfileRecord {
    pub fn from_profile(profile: &UserProfile) -> Self {
        ProfileRecord {
            id: profile.id.to_string(),
            full_name: Some(profile.name.clone()),
            email: Some(profile.email.clone()),
            city: profile.city.map(|c| c.label().to_string()),
            birth_date: profile.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
            favorite_sports: Some(
                profile
                    .favorite_sports
                    .iter()
                    .map(|s| s.label().to_string())
                    .collect(),
            ),
        }
    }

    /// Overlays the stored fields onto `profile`. Blank or unparseable fields
    /// fall back to empty values; the email falls back to the session email.
    pub fn apply_to(&self, profile: &mut UserProfile, session_email: &str) {
        profile.name = self.full_name.clone().unwrap_or_default();
        profile.email = self
            .email
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| session_email.to_string());
        profile.city = self.city.as_deref().and_then(|c| c.parse().ok());
        profile.birth_date = self
            .birth_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
        profile.favorite_sports = self
            .favorite_sports
            .iter()
            .flatten()
            .filter_map(|s| s.parse().ok())
            .collect();
    }
}
