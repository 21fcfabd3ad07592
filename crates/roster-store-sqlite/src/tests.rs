//! Integration tests for `SqliteStore` against an in-memory database.

use roster_core::{
  person::{NewIntern, NewNssPerson, NewPerson, Person, PersonDetails, RecordKind},
  store::PersonStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn details(name: &str) -> PersonDetails {
  PersonDetails {
    name:        name.into(),
    phone:       "0240000000".into(),
    institution: "University of Ghana".into(),
    course:      "Computer Science".into(),
    interest:    "Web development".into(),
    start_date:  "01/02/25".into(),
    end_date:    "31/08/25".into(),
  }
}

fn new_intern(name: &str, level: u16) -> NewPerson {
  NewPerson::Intern(NewIntern { details: details(name), level })
}

fn new_nss(name: &str, nss_id: &str) -> NewPerson {
  NewPerson::Nss(NewNssPerson {
    details: details(name),
    nss_id:  nss_id.into(),
    email:   format!("{}@example.com", name.to_lowercase()),
  })
}

// ─── Create / read ───────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_intern() {
  let s = store().await;

  let created = s.create(new_intern("Ama", 300)).await.unwrap();
  assert!(created.id() > 0);
  assert_eq!(created.level(), Some(300));

  let fetched = s.get(RecordKind::Intern, created.id()).await.unwrap();
  assert_eq!(fetched, Some(created));
}

#[tokio::test]
async fn create_and_get_nss_person() {
  let s = store().await;

  let created = s.create(new_nss("Kofi", "NSS-001")).await.unwrap();
  let fetched = s
    .get(RecordKind::Nss, created.id())
    .await
    .unwrap()
    .expect("record exists");

  let nss = fetched.as_nss_person().expect("nss record");
  assert_eq!(nss.nss_id, "NSS-001");
  assert_eq!(nss.email, "kofi@example.com");
  assert_eq!(nss.details.institution, "University of Ghana");
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(RecordKind::Intern, 42).await.unwrap().is_none());
}

#[tokio::test]
async fn kinds_live_in_separate_tables() {
  let s = store().await;
  let intern = s.create(new_intern("Ama", 100)).await.unwrap();
  let nss = s.create(new_nss("Kofi", "NSS-001")).await.unwrap();

  assert_eq!(s.list(RecordKind::Intern).await.unwrap().len(), 1);
  assert_eq!(s.list(RecordKind::Nss).await.unwrap().len(), 1);

  // Ids are assigned per table.
  assert_eq!(intern.id(), nss.id());
  let fetched = s.get(RecordKind::Nss, intern.id()).await.unwrap().unwrap();
  assert_eq!(fetched.name(), "Kofi");
}

#[tokio::test]
async fn list_is_in_id_order() {
  let s = store().await;
  for name in ["Ama", "Kofi", "Esi"] {
    s.create(new_intern(name, 200)).await.unwrap();
  }

  let names: Vec<String> = s
    .list(RecordKind::Intern)
    .await
    .unwrap()
    .iter()
    .map(|p| p.name().to_owned())
    .collect();
  assert_eq!(names, ["Ama", "Kofi", "Esi"]);
}

#[tokio::test]
async fn dates_round_trip_as_entered() {
  let s = store().await;
  let mut input = NewIntern { details: details("Yaw"), level: 400 };
  input.details.start_date = "5/1/2025".into();
  input.details.end_date = "31/02/25".into();

  let created = s.create(NewPerson::Intern(input)).await.unwrap();
  let fetched = s.get(RecordKind::Intern, created.id()).await.unwrap().unwrap();
  assert_eq!(fetched.details().start_date, "5/1/2025");
  assert_eq!(fetched.details().end_date, "31/02/25");
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_name_is_rejected() {
  let s = store().await;
  let err = s.create(new_intern("   ", 100)).await.unwrap_err();
  assert!(matches!(err, Error::Core(roster_core::Error::EmptyName)));
  assert!(s.list(RecordKind::Intern).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_nss_id_is_rejected() {
  let s = store().await;
  let err = s.create(new_nss("Kofi", "")).await.unwrap_err();
  assert!(matches!(err, Error::Core(roster_core::Error::EmptyNssId)));
}

#[tokio::test]
async fn duplicate_nss_id_on_create() {
  let s = store().await;
  s.create(new_nss("Kofi", "NSS-001")).await.unwrap();

  let err = s.create(new_nss("Esi", "NSS-001")).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateNssId(ref id) if id == "NSS-001"));
  assert_eq!(s.list(RecordKind::Nss).await.unwrap().len(), 1);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_fields() {
  let s = store().await;
  let created = s.create(new_intern("Ama", 100)).await.unwrap();

  let updated = s
    .update(created.id(), new_intern("Ama Mensah", 200))
    .await
    .unwrap()
    .expect("record exists");
  assert_eq!(updated.id(), created.id());
  assert_eq!(updated.name(), "Ama Mensah");

  let fetched = s.get(RecordKind::Intern, created.id()).await.unwrap();
  assert_eq!(fetched, Some(updated));
}

#[tokio::test]
async fn update_missing_returns_none() {
  let s = store().await;
  let result = s.update(7, new_intern("Nobody", 100)).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn update_may_keep_own_nss_id() {
  let s = store().await;
  let created = s.create(new_nss("Kofi", "NSS-001")).await.unwrap();

  let updated = s
    .update(created.id(), new_nss("Kofi Boateng", "NSS-001"))
    .await
    .unwrap();
  assert_eq!(updated.map(|p| p.name().to_owned()).as_deref(), Some("Kofi Boateng"));
}

#[tokio::test]
async fn update_to_taken_nss_id_is_rejected() {
  let s = store().await;
  s.create(new_nss("Kofi", "NSS-001")).await.unwrap();
  let esi = s.create(new_nss("Esi", "NSS-002")).await.unwrap();

  let err = s.update(esi.id(), new_nss("Esi", "NSS-001")).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateNssId(_)));

  let unchanged = s.get(RecordKind::Nss, esi.id()).await.unwrap().unwrap();
  assert_eq!(unchanged, esi);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_record() {
  let s = store().await;
  let a = s.create(new_intern("Ama", 100)).await.unwrap();
  let b = s.create(new_intern("Kofi", 100)).await.unwrap();

  assert!(s.delete(RecordKind::Intern, a.id()).await.unwrap());

  let remaining: Vec<Person> = s.list(RecordKind::Intern).await.unwrap();
  assert_eq!(remaining, vec![b]);
}

#[tokio::test]
async fn delete_missing_returns_false() {
  let s = store().await;
  assert!(!s.delete(RecordKind::Nss, 99).await.unwrap());
}

#[tokio::test]
async fn deleted_nss_id_can_be_reused() {
  let s = store().await;
  let kofi = s.create(new_nss("Kofi", "NSS-001")).await.unwrap();
  s.delete(RecordKind::Nss, kofi.id()).await.unwrap();

  assert!(s.create(new_nss("Esi", "NSS-001")).await.is_ok());
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_records() {
  let dir = std::env::temp_dir().join(format!("roster-store-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("roster.db");
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.create(new_intern("Ama", 100)).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.list(RecordKind::Intern).await.unwrap().len(), 1);

  drop(s);
  let _ = std::fs::remove_dir_all(&dir);
}
