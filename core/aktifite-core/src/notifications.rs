//! Notification feed: system-authored, newest first, read-trackable.
//!
//! Entries are immutable except for the read flag and are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActivityId, NotificationId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ActivityCreated,
    RequestSent,
    RequestReceived,
    RequestAccepted,
    RequestRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ActivityCreated => "activity_created",
            NotificationKind::RequestSent => "request_sent",
            NotificationKind::RequestReceived => "request_received",
            NotificationKind::RequestAccepted => "request_accepted",
            NotificationKind::RequestRejected => "request_rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub activity_id: ActivityId,
    /// The other user the entry is about, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterpart: Option<UserId>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
    /// Sport glyph shown next to the entry.
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new unread entry at the front of the feed.
    pub fn record(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        activity_id: ActivityId,
        counterpart: Option<UserId>,
        icon: impl Into<String>,
    ) -> NotificationId {
        self.record_at(kind, message, activity_id, counterpart, icon, Utc::now())
    }

    pub fn record_at(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        activity_id: ActivityId,
        counterpart: Option<UserId>,
        icon: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> NotificationId {
        let id = NotificationId::generate();
        self.entries.insert(
            0,
            Notification {
                id: id.clone(),
                kind,
                message: message.into(),
                activity_id,
                counterpart,
                read: false,
                created_at,
                icon: icon.into(),
            },
        );
        id
    }

    /// Marks one entry read. Unknown ids are ignored.
    pub fn mark_read(&mut self, id: &NotificationId) {
        if let Some(entry) = self.entries.iter_mut().find(|n| &n.id == id) {
            entry.read = true;
        }
    }

    pub fn mark_all_read(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Feed entries, newest first.
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| &n.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
