//! Activity roster: activities, their participants and pending join requests.
//!
//! The roster owns the transition rules only. It never records notifications
//! itself; each successful transition returns a [`RosterEvent`] describing what
//! changed, and [`crate::state::AppState`] turns that into a feed entry.
//!
//! ## Per-user state machine
//!
//! For one observing user, an activity moves through
//! `(is_participant, has_pending_request, is_full)`:
//!
//! ```text
//! (no, no, not full)  --request_join-->  (no, pending, _)
//! (no, pending, _)    --accept-------->  (participant, no, _)
//! (no, pending, _)    --reject-------->  (no, no, _)
//! ```
//!
//! Participant is terminal: there is no leave or withdraw transition.
//!
//! Guard failures are not errors. A transition that cannot apply returns
//! [`SkipReason`] and leaves the roster untouched.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActivityId, City, Sport, UserId, UserSummary};

// ═══════════════════════════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Create-activity form as typed. Date and time stay raw until validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityInput {
    pub sport: Sport,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub location: String,
    pub city: City,
    /// Zero means "use the configured default".
    #[serde(default)]
    pub max_participants: u32,
}

/// A validated activity that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub sport: Sport,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub city: City,
    pub max_participants: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
}

/// A pending request to join. Resolved requests are removed, not marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub user: UserSummary,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub sport: Sport,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
    pub city: City,
    pub max_participants: u32,
    pub current_participants: u32,
    pub created_by: UserSummary,
    #[serde(default)]
    pub participants: Vec<UserSummary>,
    #[serde(default)]
    pub requests: Vec<JoinRequest>,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Builds a freshly created activity: the creator is the only participant.
    pub fn from_draft(
        id: ActivityId,
        draft: ActivityDraft,
        creator: UserSummary,
        created_at: DateTime<Utc>,
    ) -> Self {
        Activity {
            id,
            sport: draft.sport,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            city: draft.city,
            max_participants: draft.max_participants,
            current_participants: 1,
            participants: vec![creator.clone()],
            created_by: creator,
            requests: Vec::new(),
            created_at,
        }
    }

    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    pub fn is_creator(&self, user_id: &UserId) -> bool {
        &self.created_by.id == user_id
    }

    pub fn is_participant(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| &p.id == user_id)
    }

    pub fn has_requested(&self, user_id: &UserId) -> bool {
        self.requests.iter().any(|r| &r.user.id == user_id)
    }

    /// Flags a screen needs to decide which action to offer `user_id`.
    pub fn view_for(&self, user_id: &UserId) -> ActivityView {
        ActivityView {
            is_creator: self.is_creator(user_id),
            is_participant: self.is_participant(user_id),
            has_requested: self.has_requested(user_id),
            is_full: self.is_full(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityView {
    pub is_creator: bool,
    pub is_participant: bool,
    pub has_requested: bool,
    pub is_full: bool,
}

/// Why a roster transition did not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ActivityNotFound,
    AlreadyParticipant,
    AlreadyRequested,
    ActivityFull,
    RequestNotFound,
    /// The organizer tried to open a chat with themselves.
    OwnActivity,
    /// Only the organizer may resolve join requests.
    NotOrganizer,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ActivityNotFound => "activity_not_found",
            SkipReason::AlreadyParticipant => "already_participant",
            SkipReason::AlreadyRequested => "already_requested",
            SkipReason::ActivityFull => "activity_full",
            SkipReason::RequestNotFound => "request_not_found",
            SkipReason::OwnActivity => "own_activity",
            SkipReason::NotOrganizer => "not_organizer",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of dispatching a roster intent. Skips are silent by contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// What a successful transition changed, enough to phrase a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEvent {
    pub activity_id: ActivityId,
    pub title: String,
    pub sport: Sport,
    pub user: UserSummary,
}

impl RosterEvent {
    fn new(activity: &Activity, user: UserSummary) -> Self {
        RosterEvent {
            activity_id: activity.id.clone(),
            title: activity.title.clone(),
            sport: activity.sport,
            user,
        }
    }
}

/// Search/filter criteria. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub sport: Option<Sport>,
    pub city: Option<City>,
    pub search: Option<String>,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &Activity) -> bool {
        if self.sport.is_some_and(|sport| sport != activity.sport) {
            return false;
        }
        if self.city.is_some_and(|city| city != activity.city) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                activity.title.to_lowercase().contains(&term)
                    || activity.sport.label().to_lowercase().contains(&term)
                    || activity.location.to_lowercase().contains(&term)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserActivityStats {
    pub created: usize,
    pub joined: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Roster
// ═══════════════════════════════════════════════════════════════════════════════

/// The activity collection. Newest activities are appended last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    activities: Vec<Activity>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_activities(activities: Vec<Activity>) -> Self {
        Roster { activities }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, id: &ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| &a.id == id)
    }

    fn get_mut(&mut self, id: &ActivityId) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| &a.id == id)
    }

    /// Appends a created activity and reports it. An activity whose id is
    /// already present replaces the old entry.
    pub fn insert(&mut self, activity: Activity) -> RosterEvent {
        let event = RosterEvent::new(&activity, activity.created_by.clone());
        match self.get_mut(&activity.id) {
            Some(existing) => *existing = activity,
            None => self.activities.push(activity),
        }
        event
    }

    /// Replaces the whole collection (session-start hydration).
    pub fn replace_all(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
    }

    /// Adds a pending request for `user`.
    ///
    /// Skips when the activity is unknown, the user already participates
    /// (the creator always does), a request is already pending, or the
    /// activity is full.
    pub fn request_join(
        &mut self,
        activity_id: &ActivityId,
        user: &UserSummary,
    ) -> Result<RosterEvent, SkipReason> {
        let activity = self
            .get_mut(activity_id)
            .ok_or(SkipReason::ActivityNotFound)?;

        if activity.is_participant(&user.id) || activity.is_creator(&user.id) {
            return Err(SkipReason::AlreadyParticipant);
        }
        if activity.has_requested(&user.id) {
            return Err(SkipReason::AlreadyRequested);
        }
        if activity.is_full() {
            return Err(SkipReason::ActivityFull);
        }

        activity.requests.push(JoinRequest {
            user: user.clone(),
            status: RequestStatus::Pending,
        });
        Ok(RosterEvent::new(activity, user.clone()))
    }

    /// Promotes a pending request to participant.
    ///
    /// A full activity keeps the request pending; it is not auto-rejected.
    pub fn accept_request(
        &mut self,
        activity_id: &ActivityId,
        user_id: &UserId,
    ) -> Result<RosterEvent, SkipReason> {
        let activity = self
            .get_mut(activity_id)
            .ok_or(SkipReason::ActivityNotFound)?;

        let pos = activity
            .requests
            .iter()
            .position(|r| &r.user.id == user_id)
            .ok_or(SkipReason::RequestNotFound)?;

        if activity.is_full() {
            return Err(SkipReason::ActivityFull);
        }

        let request = activity.requests.remove(pos);
        activity.participants.push(request.user.clone());
        activity.current_participants += 1;
        Ok(RosterEvent::new(activity, request.user))
    }

    /// Drops a pending request without touching participants.
    pub fn reject_request(
        &mut self,
        activity_id: &ActivityId,
        user_id: &UserId,
    ) -> Result<RosterEvent, SkipReason> {
        let activity = self
            .get_mut(activity_id)
            .ok_or(SkipReason::ActivityNotFound)?;

        let pos = activity
            .requests
            .iter()
            .position(|r| &r.user.id == user_id)
            .ok_or(SkipReason::RequestNotFound)?;

        let request = activity.requests.remove(pos);
        Ok(RosterEvent::new(activity, request.user))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────────

    /// Activities matching `filter`, in roster order.
    pub fn filter(&self, filter: &ActivityFilter) -> Vec<&Activity> {
        self.activities.iter().filter(|a| filter.matches(a)).collect()
    }

    /// All activities, newest first. Ties keep roster order.
    pub fn newest_first(&self) -> Vec<&Activity> {
        let mut list: Vec<&Activity> = self.activities.iter().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    /// Activities `user_id` participates in (including ones they created).
    pub fn joined_by(&self, user_id: &UserId) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| a.is_participant(user_id))
            .collect()
    }

    pub fn stats_for(&self, user_id: &UserId) -> UserActivityStats {
        UserActivityStats {
            created: self
                .activities
                .iter()
                .filter(|a| a.is_creator(user_id))
                .count(),
            joined: self.joined_by(user_id).len(),
        }
    }
}
