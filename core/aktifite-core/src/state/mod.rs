//! Application state: the roster plus both logs, owned by one value.
//!
//! `AppState` is the single place where a roster transition and its feed entry
//! happen together. Every applied transition records exactly one notification;
//! a skipped transition records nothing.
//!
//! Submodules:
//! - [`store`]: versioned `state.json` snapshot with defensive loading

pub mod store;

pub use store::AppStateStore;

use serde::{Deserialize, Serialize};

use crate::conversations::ConversationLog;
use crate::notifications::{NotificationKind, NotificationLog};
use crate::roster::{Activity, Outcome, Roster, RosterEvent, SkipReason};
use crate::types::{ActivityId, ThreadId, UserId, UserSummary};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub notifications: NotificationLog,
    #[serde(default)]
    pub conversations: ConversationLog,
}

fn quoted(title: &str) -> String {
    format!("\"{}\"", title)
}

fn notify(log: &mut NotificationLog, kind: NotificationKind, event: &RosterEvent) {
    let title = quoted(&event.title);
    let message = match kind {
        NotificationKind::ActivityCreated => format!("{title} aktivitesi başarıyla oluşturuldu!"),
        NotificationKind::RequestSent => format!("{title} aktivitesine katılım isteği gönderildi"),
        NotificationKind::RequestReceived => {
            format!("{} {title} aktivitenize katılmak istiyor", event.user.name)
        }
        NotificationKind::RequestAccepted => {
            format!("{} {title} aktivitesine kabul edildi", event.user.name)
        }
        NotificationKind::RequestRejected => {
            format!("{} {title} aktivitesine reddedildi", event.user.name)
        }
    };
    let counterpart = match kind {
        NotificationKind::ActivityCreated | NotificationKind::RequestSent => None,
        _ => Some(event.user.id.clone()),
    };
    log.record(
        kind,
        message,
        event.activity_id.clone(),
        counterpart,
        event.sport.glyph(),
    );
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(
        &mut self,
        kind: NotificationKind,
        result: Result<RosterEvent, SkipReason>,
    ) -> Outcome {
        match result {
            Ok(event) => {
                notify(&mut self.notifications, kind, &event);
                Outcome::Applied
            }
            Err(reason) => {
                tracing::debug!(kind = kind.as_str(), reason = %reason, "Transition skipped");
                Outcome::Skipped(reason)
            }
        }
    }

    /// Adds a newly created activity and records `activity_created`.
    pub fn add_activity(&mut self, activity: Activity) {
        let event = self.roster.insert(activity);
        notify(&mut self.notifications, NotificationKind::ActivityCreated, &event);
    }

    pub fn request_join(&mut self, activity_id: &ActivityId, user: &UserSummary) -> Outcome {
        let result = self.roster.request_join(activity_id, user);
        self.apply(NotificationKind::RequestSent, result)
    }

    pub fn accept_request(&mut self, activity_id: &ActivityId, user_id: &UserId) -> Outcome {
        let result = self.roster.accept_request(activity_id, user_id);
        self.apply(NotificationKind::RequestAccepted, result)
    }

    pub fn reject_request(&mut self, activity_id: &ActivityId, user_id: &UserId) -> Outcome {
        let result = self.roster.reject_request(activity_id, user_id);
        self.apply(NotificationKind::RequestRejected, result)
    }

    /// Records that `requester` asked to join. Transitions never produce this
    /// kind on their own; it arrives from whoever relays the request.
    pub fn notify_request_received(
        &mut self,
        activity_id: &ActivityId,
        requester: &UserSummary,
    ) -> Outcome {
        let result = self
            .roster
            .get(activity_id)
            .map(|activity| RosterEvent {
                activity_id: activity.id.clone(),
                title: activity.title.clone(),
                sport: activity.sport,
                user: requester.clone(),
            })
            .ok_or(SkipReason::ActivityNotFound);
        self.apply(NotificationKind::RequestReceived, result)
    }

    /// Opens the chat between `viewer` and the activity's organizer.
    pub fn open_thread(
        &mut self,
        activity_id: &ActivityId,
        viewer: &UserSummary,
    ) -> Result<ThreadId, SkipReason> {
        let activity = self
            .roster
            .get(activity_id)
            .ok_or(SkipReason::ActivityNotFound)?;
        if activity.is_creator(&viewer.id) {
            return Err(SkipReason::OwnActivity);
        }
        let id = self.conversations.find_or_create_thread(
            &activity.id,
            &activity.title,
            viewer,
            &activity.created_by,
        );
        self.conversations.mark_thread_read(&id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::ActivityDraft;
    use crate::types::{City, Sport};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn creator() -> UserSummary {
        UserSummary::new("creator", "Mehmet Yılmaz")
    }

    fn state_with(max: u32) -> (AppState, ActivityId) {
        let mut state = AppState::new();
        let id = ActivityId::from("act-1");
        state.add_activity(Activity::from_draft(
            id.clone(),
            ActivityDraft {
                sport: Sport::Tenis,
                title: "Sabah Tenis Maçı".to_string(),
                description: String::new(),
                date: NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(),
                time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                location: "ODTÜ Kortları".to_string(),
                city: City::Ankara,
                max_participants: max,
            },
            creator(),
            Utc::now(),
        ));
        (state, id)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Notifications per transition
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_create_records_activity_created() {
        let (state, id) = state_with(2);
        let entry = &state.notifications.entries()[0];
        assert_eq!(entry.kind, NotificationKind::ActivityCreated);
        assert_eq!(entry.activity_id, id);
        assert_eq!(entry.icon, "🎾");
        assert_eq!(
            entry.message,
            "\"Sabah Tenis Maçı\" aktivitesi başarıyla oluşturuldu!"
        );
    }

    #[test]
    fn test_each_applied_transition_records_one_entry() {
        let (mut state, id) = state_with(4);
        let b = UserSummary::new("b", "Ayşe Kaya");
        let c = UserSummary::new("c", "Ali Demir");

        assert_eq!(state.request_join(&id, &b), Outcome::Applied);
        assert_eq!(state.request_join(&id, &c), Outcome::Applied);
        assert_eq!(state.accept_request(&id, &b.id), Outcome::Applied);
        assert_eq!(state.reject_request(&id, &c.id), Outcome::Applied);

        let kinds: Vec<_> = state.notifications.entries().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::RequestRejected,
                NotificationKind::RequestAccepted,
                NotificationKind::RequestSent,
                NotificationKind::RequestSent,
                NotificationKind::ActivityCreated,
            ]
        );
        assert_eq!(
            state.notifications.entries()[1].message,
            "Ayşe Kaya \"Sabah Tenis Maçı\" aktivitesine kabul edildi"
        );
    }

    #[test]
    fn test_counterpart_names_the_other_user() {
        let (mut state, id) = state_with(4);
        let b = UserSummary::new("b", "Ayşe Kaya");
        state.request_join(&id, &b);
        assert_eq!(state.notifications.entries()[0].counterpart, None);

        state.accept_request(&id, &b.id);
        assert_eq!(state.notifications.entries()[0].counterpart, Some(b.id.clone()));

        state.notify_request_received(&id, &UserSummary::new("c", "Ali Demir"));
        assert_eq!(
            state.notifications.entries()[0].counterpart,
            Some(UserId::from("c"))
        );
        assert_eq!(state.notifications.entries().last().unwrap().counterpart, None);
    }

    #[test]
    fn test_skipped_transition_records_nothing() {
        let (mut state, id) = state_with(2);
        let before = state.notifications.len();
        assert_eq!(
            state.request_join(&id, &creator()),
            Outcome::Skipped(SkipReason::AlreadyParticipant)
        );
        assert_eq!(
            state.accept_request(&id, &UserId::from("ghost")),
            Outcome::Skipped(SkipReason::RequestNotFound)
        );
        assert_eq!(state.notifications.len(), before);
    }

    #[test]
    fn test_request_received_is_recorded_on_demand() {
        let (mut state, id) = state_with(2);
        let outcome = state.notify_request_received(&id, &UserSummary::new("b", "Ayşe Kaya"));
        assert!(outcome.is_applied());
        let entry = &state.notifications.entries()[0];
        assert_eq!(entry.kind, NotificationKind::RequestReceived);
        assert_eq!(
            entry.message,
            "Ayşe Kaya \"Sabah Tenis Maçı\" aktivitenize katılmak istiyor"
        );
        assert_eq!(
            state.notify_request_received(&ActivityId::from("nope"), &creator()),
            Outcome::Skipped(SkipReason::ActivityNotFound)
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Threads
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_open_thread_targets_organizer() {
        let (mut state, id) = state_with(2);
        let viewer = UserSummary::new("b", "Ayşe Kaya");
        let thread_id = state.open_thread(&id, &viewer).unwrap();
        let thread = state.conversations.get(&thread_id).unwrap();
        assert_eq!(thread.counterpart_of(&viewer.id), Some(&creator()));
        assert_eq!(thread.activity_title, "Sabah Tenis Maçı");
        assert_eq!(state.open_thread(&id, &viewer).unwrap(), thread_id);
    }

    #[test]
    fn test_organizer_cannot_open_thread_with_self() {
        let (mut state, id) = state_with(2);
        assert_eq!(
            state.open_thread(&id, &creator()),
            Err(SkipReason::OwnActivity)
        );
        assert!(state.conversations.threads().is_empty());
    }
}
