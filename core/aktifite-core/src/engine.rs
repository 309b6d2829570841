//! AktifiteEngine - the single entry point for clients.
//!
//! The engine exclusively owns the application state and the collaborators:
//! - **Synchronous**: no async runtime; collaborators are blocking traits
//! - **Single owner**: callers that share it wrap it in their own lock
//! - **Degrading**: collaborator failures are logged and leave state unchanged
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use aktifite_core::{AktifiteEngine, StaticSession, StorageConfig};
//!
//! let session = StaticSession::signed_in("user-1", "ayse@example.com");
//! let mut engine = AktifiteEngine::local(StorageConfig::default(), Box::new(session));
//! engine.load_snapshot()?;
//! engine.start_session()?;
//! engine.load_activities();
//! ```

use chrono::Utc;

use crate::backend::{
    activity_from_record, new_record_from_draft, ActivityStore, JsonActivityStore,
    JsonProfileStore, ProfileRecord, ProfileStore, SessionProvider,
};
use crate::config::{load_config, AppConfig};
use crate::conversations::ConversationThread;
use crate::error::{AktifiteError, Result};
use crate::notifications::Notification;
use crate::profile::ProfileCache;
use crate::roster::{Activity, ActivityFilter, ActivityInput, Outcome, SkipReason, UserActivityStats};
use crate::state::{AppState, AppStateStore};
use crate::storage::StorageConfig;
use crate::types::{ActivityId, Avatar, NotificationId, ThreadId, UserId, UserProfile, UserSummary};
use crate::validation::validate_activity;

pub struct AktifiteEngine {
    storage: StorageConfig,
    config: AppConfig,
    state: AppState,
    state_store: AppStateStore,
    profile_cache: ProfileCache,
    sessions: Box<dyn SessionProvider>,
    activities: Box<dyn ActivityStore>,
    profiles: Box<dyn ProfileStore>,
    profile: Option<UserProfile>,
}

impl AktifiteEngine {
    pub fn new(
        storage: StorageConfig,
        config: AppConfig,
        sessions: Box<dyn SessionProvider>,
        activities: Box<dyn ActivityStore>,
        profiles: Box<dyn ProfileStore>,
    ) -> Self {
        Self {
            state_store: AppStateStore::new(&storage.state_file()),
            profile_cache: ProfileCache::new(&storage.profile_cache_file()),
            storage,
            config,
            state: AppState::new(),
            sessions,
            activities,
            profiles,
            profile: None,
        }
    }

    /// Engine for the local variant: activity rows in `activities.json`,
    /// profile rows in `profiles.json`, preferences from `config.json`.
    pub fn local(storage: StorageConfig, sessions: Box<dyn SessionProvider>) -> Self {
        let config = load_config(&storage);
        let activities = Box::new(JsonActivityStore::new(&storage.activities_file()));
        let profiles = Box::new(JsonProfileStore::new(&storage.profiles_file()));
        Self::new(storage, config, sessions, activities, profiles)
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    fn current_user(&self) -> Result<UserSummary> {
        self.profile
            .as_ref()
            .map(UserProfile::summary)
            .ok_or(AktifiteError::NotAuthorized)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Session & Profile
    // ─────────────────────────────────────────────────────────────────────────────

    /// Starts a session for whoever the session provider reports.
    ///
    /// The cached profile is shown first, then overlaid once with the stored
    /// profile. A failed fetch keeps the cached profile.
    pub fn start_session(&mut self) -> Result<&UserProfile> {
        let Some(session) = self.sessions.current_session() else {
            tracing::warn!("No active session");
            return Err(AktifiteError::NotAuthorized);
        };

        let mut profile = self.profile_cache.initial_profile(&session);
        match self.profiles.fetch_profile(&session.user_id) {
            Ok(Some(record)) => record.apply_to(&mut profile, &session.email),
            Ok(None) => {
                tracing::debug!(user_id = %session.user_id, "No stored profile yet");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Profile fetch failed; keeping cached profile");
            }
        }

        if let Err(err) = self.profile_cache.save(&profile) {
            tracing::warn!(error = %err, "Failed to write profile cache");
        }
        tracing::info!(user_id = %profile.id, "Session started");
        Ok(&*self.profile.insert(profile))
    }

    /// Edits the local profile and refreshes the device cache. Nothing is
    /// sent to the profile store until [`Self::sync_profile`].
    pub fn update_profile(&mut self, edit: impl FnOnce(&mut UserProfile)) -> Result<()> {
        let profile = self.profile.as_mut().ok_or(AktifiteError::NotAuthorized)?;
        edit(profile);
        self.profile_cache.save(profile)
    }

    pub fn set_avatar_image(&mut self, data_url: impl Into<String>) -> Result<()> {
        let data_url = data_url.into();
        self.update_profile(|profile| profile.avatar = Avatar::Image { data_url })
    }

    pub fn sync_profile(&self) -> Result<()> {
        let profile = self.profile.as_ref().ok_or(AktifiteError::NotAuthorized)?;
        self.profiles
            .upsert_profile(&ProfileRecord::from_profile(profile))
            .inspect_err(|err| tracing::warn!(error = %err, "Profile sync failed"))
    }

    pub fn sign_out(&mut self) -> Result<()> {
        self.sessions.sign_out();
        if let Some(profile) = self.profile.take() {
            tracing::info!(user_id = %profile.id, "Signed out");
        }
        self.profile_cache.clear()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Activities
    // ─────────────────────────────────────────────────────────────────────────────

    /// Hydrates the roster from the activity store.
    ///
    /// Activities already in the roster keep their participants and requests;
    /// rows that fail to decode are skipped. On a store failure the roster is
    /// left as it was. Returns the number of activities now in the roster.
    pub fn load_activities(&mut self) -> usize {
        let rows = match self.activities.list_activities() {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load activities");
                return self.state.roster.len();
            }
        };

        let me = self.current_user().ok();
        let mut activities = Vec::with_capacity(rows.len());
        // Rows arrive newest first; the roster keeps newest last.
        for row in rows.into_iter().rev() {
            if let Some(existing) = self.state.roster.get(&ActivityId::from(row.id.as_str())) {
                activities.push(existing.clone());
                continue;
            }
            match activity_from_record(row, me.as_ref()) {
                Ok(activity) => activities.push(activity),
                Err(err) => tracing::warn!(error = %err, "Skipping undecodable activity row"),
            }
        }

        self.state.roster.replace_all(activities);
        tracing::debug!(count = self.state.roster.len(), "Activities loaded");
        self.state.roster.len()
    }

    /// Validates the form, stores the row and adds the activity to the roster.
    pub fn create_activity(&mut self, input: &ActivityInput) -> Result<ActivityId> {
        let me = self.current_user()?;
        let draft = validate_activity(input, &self.config)?;

        let row = self
            .activities
            .insert_activity(new_record_from_draft(&draft, &me.id))
            .inspect_err(|err| tracing::warn!(error = %err, "Activity insert failed"))?;

        let activity = activity_from_record(row, Some(&me))?;
        let id = activity.id.clone();
        self.state.add_activity(activity);
        tracing::info!(activity_id = %id, sport = %draft.sport, "Activity created");
        Ok(id)
    }

    pub fn activity(&self, id: &ActivityId) -> Option<&Activity> {
        self.state.roster.get(id)
    }

    /// Matching activities, newest first.
    pub fn list_activities(&self, filter: &ActivityFilter) -> Vec<&Activity> {
        let mut list = self.state.roster.filter(filter);
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub fn request_join(&mut self, activity_id: &ActivityId) -> Result<Outcome> {
        let me = self.current_user()?;
        let outcome = self.state.request_join(activity_id, &me);
        log_outcome("request_join", activity_id, &outcome);
        Ok(outcome)
    }

    pub fn accept_request(&mut self, activity_id: &ActivityId, user_id: &UserId) -> Result<Outcome> {
        let outcome = match self.organizer_guard(activity_id)? {
            Some(skip) => skip,
            None => self.state.accept_request(activity_id, user_id),
        };
        log_outcome("accept_request", activity_id, &outcome);
        Ok(outcome)
    }

    pub fn reject_request(&mut self, activity_id: &ActivityId, user_id: &UserId) -> Result<Outcome> {
        let outcome = match self.organizer_guard(activity_id)? {
            Some(skip) => skip,
            None => self.state.reject_request(activity_id, user_id),
        };
        log_outcome("reject_request", activity_id, &outcome);
        Ok(outcome)
    }

    fn organizer_guard(&self, activity_id: &ActivityId) -> Result<Option<Outcome>> {
        let me = self.current_user()?;
        Ok(match self.state.roster.get(activity_id) {
            None => Some(Outcome::Skipped(SkipReason::ActivityNotFound)),
            Some(activity) if !activity.is_creator(&me.id) => {
                Some(Outcome::Skipped(SkipReason::NotOrganizer))
            }
            Some(_) => None,
        })
    }

    /// Created vs joined counts for the signed-in user.
    pub fn stats(&self) -> Result<UserActivityStats> {
        let me = self.current_user()?;
        Ok(self.state.roster.stats_for(&me.id))
    }

    pub fn joined_activities(&self) -> Result<Vec<&Activity>> {
        let me = self.current_user()?;
        Ok(self.state.roster.joined_by(&me.id))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Notifications
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn notifications(&self) -> &[Notification] {
        self.state.notifications.entries()
    }

    pub fn unread_count(&self) -> usize {
        self.state.notifications.unread_count()
    }

    pub fn mark_read(&mut self, id: &NotificationId) {
        self.state.notifications.mark_read(id);
    }

    pub fn mark_all_read(&mut self) {
        self.state.notifications.mark_all_read();
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Opens the chat with the organizer of `activity_id`. `None` when the
    /// activity is unknown or the signed-in user organizes it.
    pub fn open_thread(&mut self, activity_id: &ActivityId) -> Result<Option<ThreadId>> {
        let me = self.current_user()?;
        match self.state.open_thread(activity_id, &me) {
            Ok(id) => Ok(Some(id)),
            Err(reason) => {
                tracing::debug!(activity_id = %activity_id, reason = %reason, "Thread not opened");
                Ok(None)
            }
        }
    }

    /// Sends `text` as the signed-in user. Returns whether it was appended.
    pub fn send_message(&mut self, thread_id: &ThreadId, text: &str) -> Result<bool> {
        let me = self.current_user()?;
        let sent = self
            .state
            .conversations
            .send_message_at(thread_id, &me.id, text, Utc::now());
        if !sent {
            tracing::debug!(thread_id = %thread_id, "Message ignored");
        }
        Ok(sent)
    }

    pub fn threads(&self) -> Result<Vec<&ConversationThread>> {
        let me = self.current_user()?;
        Ok(self.state.conversations.threads_for(&me.id))
    }

    pub fn thread(&self, thread_id: &ThreadId) -> Option<&ConversationThread> {
        self.state.conversations.get(thread_id)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Snapshot
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn load_snapshot(&mut self) -> Result<()> {
        self.state = self.state_store.load()?;
        Ok(())
    }

    pub fn save_snapshot(&self) -> Result<()> {
        self.state_store.save(&self.state)
    }
}

fn log_outcome(intent: &str, activity_id: &ActivityId, outcome: &Outcome) {
    match outcome {
        Outcome::Applied => {
            tracing::info!(intent, activity_id = %activity_id, "Roster updated");
        }
        Outcome::Skipped(reason) => {
            tracing::debug!(intent, activity_id = %activity_id, reason = %reason, "Roster intent skipped");
        }
    }
}
