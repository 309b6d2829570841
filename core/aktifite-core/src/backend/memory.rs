//! In-process collaborators.
//!
//! Used by tests and by embedders that keep everything in memory. Each store
//! can be switched into a failing mode to exercise degradation paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use super::{
    ActivityRecord, ActivityStore, NewActivityRecord, ProfileRecord, ProfileStore, Session,
    SessionProvider,
};
use crate::error::{AktifiteError, Result};
use crate::types::UserId;

/// Fixed session that can be signed out.
#[derive(Debug, Default)]
pub struct StaticSession {
    session: Mutex<Option<Session>>,
}

impl StaticSession {
    pub fn signed_in(user_id: impl Into<UserId>, email: impl Into<String>) -> Self {
        StaticSession {
            session: Mutex::new(Some(Session {
                user_id: user_id.into(),
                email: email.into(),
            })),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl SessionProvider for StaticSession {
    fn current_session(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn sign_out(&self) {
        *self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

#[derive(Debug, Default)]
pub struct MemoryActivityStore {
    rows: Mutex<Vec<ActivityRecord>>,
    next_id: Mutex<u64>,
    failing: AtomicBool,
}

impl MemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<ActivityRecord>) -> Self {
        let store = Self::default();
        *store.rows.lock().unwrap_or_else(|p| p.into_inner()) = rows;
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    fn check(&self, operation: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AktifiteError::backend(operation, "store unavailable"));
        }
        Ok(())
    }
}

impl ActivityStore for MemoryActivityStore {
    fn list_activities(&self) -> Result<Vec<ActivityRecord>> {
        self.check("list activities")?;
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner()).clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn insert_activity(&self, record: NewActivityRecord) -> Result<ActivityRecord> {
        self.check("insert activity")?;
        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(|p| p.into_inner());
            *next += 1;
            *next
        };
        let row = ActivityRecord::from_new(id.to_string(), record, Utc::now());
        self.rows
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(row.clone());
        Ok(row)
    }
}

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    rows: Mutex<HashMap<String, ProfileRecord>>,
    failing: AtomicBool,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(record: ProfileRecord) -> Self {
        let store = Self::default();
        store
            .rows
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(record.id.clone(), record);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, id: &str) -> Option<ProfileRecord> {
        self.rows
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(id)
            .cloned()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn fetch_profile(&self, user_id: &UserId) -> Result<Option<ProfileRecord>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AktifiteError::backend("fetch profile", "store unavailable"));
        }
        Ok(self.get(user_id.as_str()))
    }

    fn upsert_profile(&self, record: &ProfileRecord) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AktifiteError::backend("upsert profile", "store unavailable"));
        }
        self.rows
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(record.id.clone(), record.clone());
        Ok(())
    }
}
