//! Local variant: activity rows on disk, snapshot restore, profile hydration.

use std::sync::Arc;

use aktifite_core::{
    ActivityId, ActivityInput, ActivityRecord, ActivityStore, AktifiteEngine, AppConfig, City,
    JsonActivityStore, MemoryActivityStore, MemoryProfileStore, Outcome, ProfileCache,
    ProfileRecord, ProfileStore, SkipReason, Sport, StaticSession, StorageConfig, UserId,
    UserProfile,
};
use chrono::Utc;
use tempfile::TempDir;

fn yoga() -> ActivityInput {
    ActivityInput {
        sport: Sport::Yoga,
        title: "Gün Batımı Yogası".to_string(),
        description: String::new(),
        date: "2025-03-01".to_string(),
        time: "18:30".to_string(),
        location: "Kordon".to_string(),
        city: City::Izmir,
        max_participants: 80,
    }
}

#[test]
fn test_local_engine_persists_rows_and_snapshot() {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());

    let mut engine = AktifiteEngine::local(
        storage.clone(),
        Box::new(StaticSession::signed_in("u1", "u1@example.com")),
    );
    engine.start_session().unwrap();
    let id = engine.create_activity(&yoga()).unwrap();
    assert_eq!(engine.activity(&id).unwrap().max_participants, 50);
    engine.save_snapshot().unwrap();

    let rows = JsonActivityStore::new(&storage.activities_file())
        .list_activities()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sport_type, "Yoga");
    assert_eq!(rows[0].city, "İzmir");

    let mut reopened = AktifiteEngine::local(
        storage,
        Box::new(StaticSession::signed_in("u1", "u1@example.com")),
    );
    reopened.load_snapshot().unwrap();
    reopened.start_session().unwrap();
    assert_eq!(reopened.load_activities(), 1);
    assert_eq!(reopened.notifications().len(), 1);
    assert_eq!(reopened.activity(&id).unwrap().title, "Gün Batımı Yogası");
}

#[test]
fn test_hydrate_from_rows_without_snapshot() {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());
    let store = JsonActivityStore::new(&storage.activities_file());
    let mut seeded = AktifiteEngine::local(
        storage.clone(),
        Box::new(StaticSession::signed_in("org", "")),
    );
    seeded.start_session().unwrap();
    seeded.create_activity(&yoga()).unwrap();
    assert_eq!(store.list_activities().unwrap().len(), 1);

    let mut viewer =
        AktifiteEngine::local(storage, Box::new(StaticSession::signed_in("viewer", "")));
    viewer.start_session().unwrap();
    assert_eq!(viewer.load_activities(), 1);

    let activity = viewer.state().roster.activities()[0].clone();
    assert_eq!(activity.current_participants, 1);
    assert_eq!(activity.created_by.name, "Organizatör");
}

#[test]
fn test_profile_hydration_overlays_cache_and_falls_back_on_failure() {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());

    let mut cached = UserProfile::new("u1");
    cached.name = "Önbellek Adı".to_string();
    ProfileCache::new(&storage.profile_cache_file())
        .save(&cached)
        .unwrap();

    let profiles = MemoryProfileStore::with_profile(ProfileRecord {
        id: "u1".to_string(),
        full_name: Some("Ayşe Kaya".to_string()),
        email: None,
        city: Some("Ankara".to_string()),
        birth_date: None,
        favorite_sports: Some(vec!["Tenis".to_string()]),
    });
    let mut engine = AktifiteEngine::new(
        storage.clone(),
        AppConfig::default(),
        Box::new(StaticSession::signed_in("u1", "ayse@example.com")),
        Box::new(MemoryActivityStore::new()),
        Box::new(profiles),
    );
    let profile = engine.start_session().unwrap().clone();
    assert_eq!(profile.name, "Ayşe Kaya");
    assert_eq!(profile.email, "ayse@example.com");
    assert_eq!(profile.city, Some(City::Ankara));

    let failing = MemoryProfileStore::new();
    failing.set_failing(true);
    let mut offline = AktifiteEngine::new(
        storage,
        AppConfig::default(),
        Box::new(StaticSession::signed_in("u1", "ayse@example.com")),
        Box::new(MemoryActivityStore::new()),
        Box::new(failing),
    );
    assert_eq!(offline.start_session().unwrap(), &profile);
    assert!(offline.sync_profile().is_err());
}

#[test]
fn test_sync_profile_upserts_edits() {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());
    let profiles = Arc::new(MemoryProfileStore::new());
    let mut engine = AktifiteEngine::new(
        storage.clone(),
        AppConfig::default(),
        Box::new(StaticSession::signed_in("u1", "u1@example.com")),
        Box::new(MemoryActivityStore::new()),
        Box::new(Arc::clone(&profiles)),
    );
    engine.start_session().unwrap();
    engine
        .update_profile(|p| {
            p.name = "Mehmet Yılmaz".to_string();
            p.favorite_sports = vec![Sport::Basketbol];
        })
        .unwrap();
    assert_eq!(profiles.fetch_profile(&UserId::from("u1")).unwrap(), None);

    engine.sync_profile().unwrap();

    let stored = profiles.fetch_profile(&UserId::from("u1")).unwrap().unwrap();
    assert_eq!(stored.full_name.as_deref(), Some("Mehmet Yılmaz"));
    assert_eq!(stored.favorite_sports, Some(vec!["Basketbol".to_string()]));
    assert_eq!(stored.email.as_deref(), Some("u1@example.com"));

    // A fresh device with no cache hydrates from the synced row.
    ProfileCache::new(&storage.profile_cache_file()).clear().unwrap();
    let mut other_device = AktifiteEngine::new(
        storage,
        AppConfig::default(),
        Box::new(StaticSession::signed_in("u1", "u1@example.com")),
        Box::new(MemoryActivityStore::new()),
        Box::new(Arc::clone(&profiles)),
    );
    let profile = other_device.start_session().unwrap();
    assert_eq!(profile.name, "Mehmet Yılmaz");
    assert_eq!(profile.favorite_sports, vec![Sport::Basketbol]);
}

#[test]
fn test_hydrated_row_with_tiny_cap_keeps_count_within_cap() {
    let temp = TempDir::new().unwrap();
    let row = ActivityRecord {
        id: "row-1".to_string(),
        organizer_id: "org".to_string(),
        sport_type: "Tenis".to_string(),
        title: "Eski Kayıt".to_string(),
        description: None,
        date: "2025-02-10".to_string(),
        time: "08:00:00".to_string(),
        city: "Ankara".to_string(),
        location: "ODTÜ".to_string(),
        max_participants: 0,
        created_at: Utc::now(),
    };
    let mut engine = AktifiteEngine::new(
        StorageConfig::with_root(temp.path().to_path_buf()),
        AppConfig::default(),
        Box::new(StaticSession::signed_in("viewer", "")),
        Box::new(MemoryActivityStore::with_rows(vec![row])),
        Box::new(MemoryProfileStore::new()),
    );
    engine.start_session().unwrap();
    assert_eq!(engine.load_activities(), 1);

    let id = ActivityId::from("row-1");
    let activity = engine.activity(&id).unwrap();
    assert_eq!(activity.max_participants, 2);
    assert!(activity.current_participants <= activity.max_participants);
    assert!(engine.joined_activities().unwrap().is_empty());

    assert_eq!(engine.request_join(&id).unwrap(), Outcome::Applied);
    assert_eq!(
        engine.request_join(&id).unwrap(),
        Outcome::Skipped(SkipReason::AlreadyRequested)
    );
}

#[test]
fn test_local_profiles_survive_switching_users() {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_root(temp.path().to_path_buf());
    let run_as = |user: &str| {
        let mut engine =
            AktifiteEngine::local(storage.clone(), Box::new(StaticSession::signed_in(user, "")));
        engine.load_snapshot().unwrap();
        engine.start_session().unwrap();
        engine.load_activities();
        engine
    };

    let mut ali = run_as("ali");
    ali.update_profile(|p| p.name = "Ali Demir".to_string()).unwrap();
    ali.sync_profile().unwrap();
    ali.save_snapshot().unwrap();

    let mut ayse = run_as("ayse");
    ayse.update_profile(|p| p.name = "Ayşe Kaya".to_string()).unwrap();
    ayse.sync_profile().unwrap();
    let id = ayse.create_activity(&yoga()).unwrap();
    ayse.save_snapshot().unwrap();

    let mut ali = run_as("ali");
    assert_eq!(ali.profile().unwrap().name, "Ali Demir");
    assert_eq!(ali.request_join(&id).unwrap(), Outcome::Applied);
    ali.save_snapshot().unwrap();

    let ayse = run_as("ayse");
    let request = &ayse.activity(&id).unwrap().requests[0];
    assert_eq!(request.user.name, "Ali Demir");
    assert_eq!(ayse.joined_activities().unwrap().len(), 1);
}
