//! End-to-end roster and feed scenarios through the engine.

use aktifite_core::{
    ActivityInput, AktifiteEngine, AppConfig, City, MemoryActivityStore, MemoryProfileStore,
    NotificationKind, Outcome, SkipReason, Sport, StaticSession, StorageConfig, UserId,
};
use tempfile::TempDir;

fn engine_as(temp: &TempDir, user: &str) -> AktifiteEngine {
    AktifiteEngine::new(
        StorageConfig::with_root(temp.path().to_path_buf()),
        AppConfig::default(),
        Box::new(StaticSession::signed_in(user, format!("{user}@example.com"))),
        Box::new(MemoryActivityStore::new()),
        Box::new(MemoryProfileStore::new()),
    )
}

fn tennis(max: u32) -> ActivityInput {
    ActivityInput {
        sport: Sport::Tenis,
        title: "Sabah Tenis Maçı".to_string(),
        description: "Çiftler maçı".to_string(),
        date: "2025-02-10".to_string(),
        time: "08:00".to_string(),
        location: "ODTÜ Kortları".to_string(),
        city: City::Ankara,
        max_participants: max,
    }
}

/// Switches the acting user by persisting state and reopening as someone else.
fn switch_user(engine: AktifiteEngine, temp: &TempDir, user: &str) -> AktifiteEngine {
    engine.save_snapshot().unwrap();
    let mut next = engine_as(temp, user);
    next.load_snapshot().unwrap();
    next.start_session().unwrap();
    next
}

#[test]
fn test_full_activity_drops_further_requests() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_as(&temp, "creator");
    engine.start_session().unwrap();

    let id = engine.create_activity(&tennis(2)).unwrap();
    assert_eq!(engine.activity(&id).unwrap().current_participants, 1);

    let mut engine = switch_user(engine, &temp, "b");
    assert_eq!(engine.request_join(&id).unwrap(), Outcome::Applied);
    let pending: Vec<_> = engine
        .activity(&id)
        .unwrap()
        .requests
        .iter()
        .map(|r| r.user.id.clone())
        .collect();
    assert_eq!(pending, vec![UserId::from("b")]);

    let mut engine = switch_user(engine, &temp, "creator");
    assert_eq!(
        engine.accept_request(&id, &UserId::from("b")).unwrap(),
        Outcome::Applied
    );
    let activity = engine.activity(&id).unwrap();
    let participants: Vec<_> = activity.participants.iter().map(|p| p.id.clone()).collect();
    assert_eq!(participants, vec![UserId::from("creator"), UserId::from("b")]);
    assert!(activity.requests.is_empty());
    assert_eq!(activity.current_participants, 2);

    let mut engine = switch_user(engine, &temp, "c");
    let before = engine.activity(&id).unwrap().clone();
    let feed_before = engine.notifications().len();
    assert_eq!(
        engine.request_join(&id).unwrap(),
        Outcome::Skipped(SkipReason::ActivityFull)
    );
    assert_eq!(engine.activity(&id).unwrap(), &before);
    assert_eq!(engine.notifications().len(), feed_before);
}

#[test]
fn test_mark_one_then_all_read_leaves_nothing_unread() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_as(&temp, "creator");
    engine.start_session().unwrap();
    for _ in 0..3 {
        engine.create_activity(&tennis(4)).unwrap();
    }
    assert_eq!(engine.unread_count(), 3);

    let first = engine.notifications()[0].id.clone();
    engine.mark_read(&first);
    assert_eq!(engine.unread_count(), 2);

    engine.mark_all_read();
    assert_eq!(engine.unread_count(), 0);
    assert!(engine
        .notifications()
        .iter()
        .all(|n| n.kind == NotificationKind::ActivityCreated));
}

#[test]
fn test_chat_with_organizer_reuses_thread() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_as(&temp, "creator");
    engine.start_session().unwrap();
    let id = engine.create_activity(&tennis(4)).unwrap();
    assert_eq!(engine.open_thread(&id).unwrap(), None);

    let mut engine = switch_user(engine, &temp, "b");
    let thread = engine.open_thread(&id).unwrap().unwrap();
    assert!(engine.send_message(&thread, "Raket getireyim mi?").unwrap());
    assert!(!engine.send_message(&thread, "   ").unwrap());
    assert_eq!(engine.open_thread(&id).unwrap(), Some(thread.clone()));

    let threads = engine.threads().unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].last_message, "Raket getireyim mi?");
    assert_eq!(threads[0].messages.len(), 1);
}

#[test]
fn test_rejected_request_can_be_sent_again() {
    let temp = TempDir::new().unwrap();
    let mut engine = engine_as(&temp, "creator");
    engine.start_session().unwrap();
    let id = engine.create_activity(&tennis(3)).unwrap();

    let mut engine = switch_user(engine, &temp, "b");
    engine.request_join(&id).unwrap();

    let mut engine = switch_user(engine, &temp, "creator");
    assert_eq!(
        engine.reject_request(&id, &UserId::from("b")).unwrap(),
        Outcome::Applied
    );
    assert_eq!(engine.notifications()[0].kind, NotificationKind::RequestRejected);

    let mut engine = switch_user(engine, &temp, "b");
    assert_eq!(engine.request_join(&id).unwrap(), Outcome::Applied);
    assert_eq!(engine.stats().unwrap().joined, 0);
}
