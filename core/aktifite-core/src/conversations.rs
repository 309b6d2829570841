//! Per-activity, two-party chat threads.
//!
//! A thread is created lazily the first time a user messages the other party
//! about an activity. Lookup and creation are indistinguishable to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActivityId, ThreadId, UserId, UserSummary};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender_id: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationThread {
    pub id: ThreadId,
    pub activity_id: ActivityId,
    pub activity_title: String,
    pub participants: [UserSummary; 2],
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    #[serde(default)]
    pub unread: bool,
}

impl ConversationThread {
    pub fn has_participant(&self, user_id: &UserId) -> bool {
        self.participants.iter().any(|p| &p.id == user_id)
    }

    /// The participant that is not `viewer`.
    pub fn counterpart_of(&self, viewer: &UserId) -> Option<&UserSummary> {
        self.participants.iter().find(|p| &p.id != viewer)
    }

    fn push(&mut self, message: ChatMessage) {
        self.last_message = message.text.clone();
        self.last_message_at = message.sent_at;
        self.messages.push(message);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    threads: Vec<ConversationThread>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn threads(&self) -> &[ConversationThread] {
        &self.threads
    }

    pub fn get(&self, id: &ThreadId) -> Option<&ConversationThread> {
        self.threads.iter().find(|t| &t.id == id)
    }

    fn get_mut(&mut self, id: &ThreadId) -> Option<&mut ConversationThread> {
        self.threads.iter_mut().find(|t| &t.id == id)
    }

    /// Returns the thread for `(activity, counterpart)` seen by `viewer`,
    /// creating an empty one when none exists.
    pub fn find_or_create_thread(
        &mut self,
        activity_id: &ActivityId,
        activity_title: &str,
        viewer: &UserSummary,
        counterpart: &UserSummary,
    ) -> ThreadId {
        let existing = self.threads.iter().find(|t| {
            &t.activity_id == activity_id
                && t.has_participant(&counterpart.id)
                && t.has_participant(&viewer.id)
        });
        if let Some(thread) = existing {
            return thread.id.clone();
        }

        let id = ThreadId::generate();
        tracing::debug!(thread_id = %id, activity_id = %activity_id, "Thread created");
        self.threads.push(ConversationThread {
            id: id.clone(),
            activity_id: activity_id.clone(),
            activity_title: activity_title.to_string(),
            participants: [viewer.clone(), counterpart.clone()],
            messages: Vec::new(),
            last_message: String::new(),
            last_message_at: Utc::now(),
            unread: false,
        });
        id
    }

    /// Appends a message from the local user. Blank text or an unknown thread
    /// is ignored. Returns whether a message was appended.
    pub fn send_message(&mut self, thread_id: &ThreadId, sender_id: &UserId, text: &str) -> bool {
        self.send_message_at(thread_id, sender_id, text, Utc::now())
    }

    pub fn send_message_at(
        &mut self,
        thread_id: &ThreadId,
        sender_id: &UserId,
        text: &str,
        sent_at: DateTime<Utc>,
    ) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let Some(thread) = self.get_mut(thread_id) else {
            return false;
        };
        thread.push(ChatMessage {
            sender_id: sender_id.clone(),
            text: text.to_string(),
            sent_at,
        });
        thread.unread = false;
        true
    }

    /// Appends a message delivered from the other party and flags the thread
    /// unread.
    pub fn receive_message(
        &mut self,
        thread_id: &ThreadId,
        sender_id: &UserId,
        text: &str,
        sent_at: DateTime<Utc>,
    ) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let Some(thread) = self.get_mut(thread_id) else {
            return false;
        };
        thread.push(ChatMessage {
            sender_id: sender_id.clone(),
            text: text.to_string(),
            sent_at,
        });
        thread.unread = true;
        true
    }

    /// Clears the unread flag when a thread is opened.
    pub fn mark_thread_read(&mut self, thread_id: &ThreadId) {
        if let Some(thread) = self.get_mut(thread_id) {
            thread.unread = false;
        }
    }

    pub fn unread_thread_count(&self) -> usize {
        self.threads.iter().filter(|t| t.unread).count()
    }

    /// Threads `user_id` takes part in, most recent message first.
    pub fn threads_for(&self, user_id: &UserId) -> Vec<&ConversationThread> {
        let mut threads: Vec<_> = self
            .threads
            .iter()
            .filter(|t| t.has_participant(user_id))
            .collect();
        threads.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        threads
    }
}
