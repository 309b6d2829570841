//! # aktifite-core
//!
//! Core library for Aktifite: an activity roster for pick-up sports meet-ups,
//! with a notification feed and per-activity two-party chat.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Clients can wrap with async if needed.
//! - **Single owner**: `AktifiteEngine` owns all state; clients provide their own
//!   synchronization (`Mutex`, `RwLock`) if they share it.
//! - **Graceful degradation**: Missing or corrupt files return empty/default values,
//!   failed collaborator calls leave state unchanged.
//! - **Silent guards**: A roster intent that cannot apply is reported as
//!   `Outcome::Skipped`, never as an error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aktifite_core::{AktifiteEngine, StaticSession, StorageConfig};
//!
//! let session = StaticSession::signed_in("user-1", "ayse@example.com");
//! let mut engine = AktifiteEngine::local(StorageConfig::default(), Box::new(session));
//! engine.start_session()?;
//! engine.load_activities();
//! let stats = engine.stats()?;
//! ```

pub mod backend;
pub mod config;
pub mod conversations;
pub mod engine;
pub mod error;
pub mod notifications;
pub mod patterns;
pub mod profile;
pub mod relative_time;
pub mod roster;
pub mod state;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use backend::{
    ActivityRecord, ActivityStore, JsonActivityStore, JsonProfileStore, MemoryActivityStore,
    MemoryProfileStore, NewActivityRecord, ProfileRecord, ProfileStore, Session, SessionProvider,
    StaticSession,
};
pub use config::{load_config, save_config, AppConfig};
pub use conversations::{ChatMessage, ConversationLog, ConversationThread};
pub use engine::AktifiteEngine;
pub use error::{AktifiteError, Result};
pub use notifications::{Notification, NotificationKind, NotificationLog};
pub use profile::ProfileCache;
pub use relative_time::{relative_age, RelativeAge};
pub use roster::{
    Activity, ActivityFilter, ActivityInput, ActivityView, JoinRequest, Outcome, Roster,
    SkipReason, UserActivityStats,
};
pub use state::{AppState, AppStateStore};
pub use storage::StorageConfig;
pub use types::*;
pub use validation::{
    validate_activity, validate_sign_in, NewAccount, SignUpForm, SignUpWizard, ValidationErrors,
};
