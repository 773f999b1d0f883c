// File: tests/records_roundtrip.rs
use convene::context::{AppContext, TestContext};
use convene::messages;
use convene::model::fields::{format_storage, parse_date_time, Email, Name, Phone, Reason, Tag, Telegram, Title};
use convene::model::{Appointment, Event, Profile, ProfileId};
use convene::storage::LocalStorage;
use convene::store::RecordStore;
use serial_test::serial;
use std::collections::BTreeSet;
use std::fs;

fn make_profile(name: &str, phone: &str, email: &str) -> Profile {
    Profile::new(
        Name::new(name).unwrap(),
        Phone::new(phone).unwrap(),
        Email::new(email).unwrap(),
        Telegram::none(),
        BTreeSet::new(),
    )
}

fn tag_set(tags: &[&str]) -> BTreeSet<Tag> {
    tags.iter().map(|tag| Tag::new(tag).unwrap()).collect()
}

fn make_event(title: &str, start: &str, end: &str, tags: &[&str]) -> Event {
    Event::new(
        Title::new(title).unwrap(),
        parse_date_time(start).unwrap(),
        parse_date_time(end).unwrap(),
        tag_set(tags),
    )
    .unwrap()
}

#[test]
#[serial]
fn test_a_full_roster_survives_a_round_trip() {
    let ctx = TestContext::new();

    let mut store = RecordStore::new();
    store
        .add_profile(Profile::new(
            Name::new("Alice Pauline").unwrap(),
            Phone::new("94351253").unwrap(),
            Email::new("alice@example.com").unwrap(),
            Telegram::new("@alicep").unwrap(),
            tag_set(&["friends"]),
        ))
        .unwrap();
    store
        .add_profile(Profile::new(
            Name::new("Benson Meier").unwrap(),
            Phone::new("98765432").unwrap(),
            Email::new("benson@example.com").unwrap(),
            Telegram::none(),
            tag_set(&["friends", "owesMoney"]),
        ))
        .unwrap();
    store
        .add_profile(make_profile("Carl Kurz", "95352563", "heinz@example.com"))
        .unwrap();

    store
        .add_event(make_event("Standup", "2022-10-12 09:00", "2022-10-12 09:30", &["work"]))
        .unwrap();
    store
        .add_event(make_event("Team lunch", "2022-10-12 12:00", "2022-10-12 13:00", &[]))
        .unwrap();

    let alice = ProfileId::new(Name::new("Alice Pauline").unwrap());
    let benson = ProfileId::new(Name::new("Benson Meier").unwrap());
    let standup = store.events()[0].id();
    store
        .add_attendees(&standup, &[alice.clone(), benson.clone()])
        .unwrap();

    store
        .book_appointment(Appointment::new(
            Reason::new("Dental checkup").unwrap(),
            parse_date_time("2022-10-14 16:30").unwrap(),
            false,
            alice.clone(),
        ))
        .unwrap();
    store
        .book_appointment(Appointment::new(
            Reason::new("Sore throat, dry cough").unwrap(),
            parse_date_time("2022-10-17 10:00").unwrap(),
            true,
            benson.clone(),
        ))
        .unwrap();

    LocalStorage::save(&ctx, &store).unwrap();
    let loaded = LocalStorage::load(&ctx).unwrap();

    assert!(loaded.is_consistent());

    let profiles = loaded.profiles();
    assert_eq!(profiles.len(), 3);
    assert_eq!(profiles[0].name().as_str(), "Alice Pauline");
    assert_eq!(profiles[0].telegram().as_str(), "@alicep");
    assert!(profiles[0].tags().contains(&Tag::new("friends").unwrap()));
    assert_eq!(profiles[1].tags().len(), 2);

    let events = loaded.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].attendees(), [alice.clone(), benson.clone()]);
    assert!(events[1].attendees().is_empty());
    assert!(profiles[0].attends(&standup));
    assert!(!profiles[2].attends(&standup));

    let appointments = loaded.appointments();
    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0].patient(), &alice);
    assert!(!appointments[0].is_marked());
    assert_eq!(appointments[1].reason().as_str(), "Sore throat, dry cough");
    assert!(appointments[1].is_marked());

    // The export is exactly what save wrote.
    let exported = LocalStorage::export_string(&ctx).unwrap();
    assert!(exported.contains("Alice Pauline"));
    assert!(exported.contains("Dental checkup"));
}

#[test]
#[serial]
fn test_missing_keys_fall_back_to_defaults() {
    let ctx = TestContext::new();
    let path = ctx.get_records_file_path().unwrap();
    let json = r#"{
  "version": 1,
  "profiles": [
    {"name": "Alice", "phone": "94351253", "email": "alice@example.com"}
  ]
}"#;
    fs::write(&path, json).unwrap();

    let loaded = LocalStorage::load(&ctx).unwrap();
    assert_eq!(loaded.profiles().len(), 1);
    assert!(loaded.profiles()[0].telegram().is_empty());
    assert!(loaded.profiles()[0].tags().is_empty());
    assert!(loaded.events().is_empty());
    assert!(loaded.appointments().is_empty());
}

#[test]
#[serial]
fn test_a_duplicate_profile_in_the_file_is_rejected() {
    let ctx = TestContext::new();
    let path = ctx.get_records_file_path().unwrap();
    let json = r#"{
  "version": 1,
  "profiles": [
    {"name": "Alice", "phone": "94351253", "email": "alice@example.com"},
    {"name": "Alice", "phone": "98765432", "email": "other@example.com"}
  ]
}"#;
    fs::write(&path, json).unwrap();

    let err = LocalStorage::load(&ctx).unwrap_err();
    assert_eq!(err.to_string(), messages::MESSAGE_DUPLICATE_PROFILE);
}

#[test]
#[serial]
fn test_an_unknown_patient_in_the_file_is_rejected() {
    let ctx = TestContext::new();
    let path = ctx.get_records_file_path().unwrap();
    let json = r#"{
  "version": 1,
  "appointments": [
    {"reason": "Checkup", "date_time": "2022-10-14 16:30", "patient": "Ghost"}
  ]
}"#;
    fs::write(&path, json).unwrap();

    let err = LocalStorage::load(&ctx).unwrap_err();
    assert!(err.to_string().contains(messages::MESSAGE_UNKNOWN_PATIENT));
    assert!(err.to_string().contains("Ghost"));
}

#[test]
#[serial]
fn test_saving_recovers_once_the_file_is_fixed() {
    let ctx = TestContext::new();
    let path = ctx.get_records_file_path().unwrap();

    fs::write(&path, "not json").unwrap();
    assert!(LocalStorage::load(&ctx).is_err());

    let blocked = LocalStorage::save(&ctx, &RecordStore::new()).unwrap_err();
    assert!(blocked.to_string().contains("previous load failed"));

    // Fixing the file by hand clears the block on the next load.
    fs::write(&path, r#"{"version": 1}"#).unwrap();
    let loaded = LocalStorage::load(&ctx).unwrap();
    assert!(loaded.profiles().is_empty());
    LocalStorage::save(&ctx, &loaded).unwrap();
}

#[test]
#[serial]
fn test_hand_edited_date_order_is_normalized_on_save() {
    let ctx = TestContext::new();
    let path = ctx.get_records_file_path().unwrap();
    let json = r#"{
  "version": 1,
  "events": [
    {"title": "Standup", "start": "09:00 2022-10-12", "end": "2022-10-12 09:30"}
  ]
}"#;
    fs::write(&path, json).unwrap();

    let loaded = LocalStorage::load(&ctx).unwrap();
    assert_eq!(format_storage(&loaded.events()[0].start()), "2022-10-12 09:00");

    LocalStorage::save(&ctx, &loaded).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("2022-10-12 09:00"));
    assert!(!written.contains("09:00 2022-10-12"));
}
