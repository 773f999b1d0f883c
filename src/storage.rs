// Manages the JSON records file.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to StoredProfile, StoredEvent or StoredAppointment require
// incrementing RECORDS_VERSION below so old files are refused instead
// of misread.
use crate::context::AppContext;
use crate::messages;
use crate::model::fields::{format_storage, parse_date_time};
use crate::model::{Appointment, Email, Event, Name, Phone, Profile, ProfileId, Reason, Tag, Telegram, Title};
use crate::store::RecordStore;
use anyhow::Result;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

// Increment this when making breaking changes to the stored record shapes.
// Version history:
// - v1: Initial format (every field stored as a plain string)
const RECORDS_VERSION: u32 = 1;

/// Wrapper struct for the versioned records file
#[derive(Serialize, Deserialize)]
struct RecordsFileData {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    profiles: Vec<StoredProfile>,
    #[serde(default)]
    events: Vec<StoredEvent>,
    #[serde(default)]
    appointments: Vec<StoredAppointment>,
}

/// Flat, all-string form of a profile as it appears on disk.
#[derive(Serialize, Deserialize)]
struct StoredProfile {
    name: String,
    phone: String,
    email: String,
    #[serde(default)]
    telegram: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Flat form of an event. Attendance is stored on this side only, as a
/// list of profile names; the reverse links are rebuilt on load.
#[derive(Serialize, Deserialize)]
struct StoredEvent {
    title: String,
    start: String,
    end: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    attendees: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct StoredAppointment {
    reason: String,
    date_time: String,
    #[serde(default)]
    marked: bool,
    patient: String,
}

impl StoredProfile {
    fn from_model(profile: &Profile) -> Self {
        Self {
            name: profile.name().to_string(),
            phone: profile.phone().to_string(),
            email: profile.email().to_string(),
            telegram: profile.telegram().as_str().to_string(),
            tags: profile.tags().iter().map(|tag| tag.to_string()).collect(),
        }
    }

    /// Re-validates every field exactly like interactive input would be.
    fn to_model(&self) -> Result<Profile> {
        let telegram = if self.telegram.trim().is_empty() {
            Telegram::none()
        } else {
            Telegram::new(&self.telegram)?
        };
        let mut tags = BTreeSet::new();
        for tag in &self.tags {
            tags.insert(Tag::new(tag)?);
        }
        Ok(Profile::new(
            Name::new(&self.name)?,
            Phone::new(&self.phone)?,
            Email::new(&self.email)?,
            telegram,
            tags,
        ))
    }
}

impl StoredEvent {
    fn from_model(event: &Event) -> Self {
        Self {
            title: event.title().to_string(),
            start: format_storage(&event.start()),
            end: format_storage(&event.end()),
            tags: event.tags().iter().map(|tag| tag.to_string()).collect(),
            attendees: event
                .attendees()
                .iter()
                .map(|id| id.name().to_string())
                .collect(),
        }
    }

    fn to_model(&self) -> Result<Event> {
        let mut tags = BTreeSet::new();
        for tag in &self.tags {
            tags.insert(Tag::new(tag)?);
        }
        let event = Event::new(
            Title::new(&self.title)?,
            parse_date_time(&self.start)?,
            parse_date_time(&self.end)?,
            tags,
        )?;
        Ok(event)
    }
}

impl StoredAppointment {
    fn from_model(appointment: &Appointment) -> Self {
        Self {
            reason: appointment.reason().to_string(),
            date_time: format_storage(&appointment.date_time()),
            marked: appointment.is_marked(),
            patient: appointment.patient().name().to_string(),
        }
    }
}

impl RecordsFileData {
    fn from_store(store: &RecordStore) -> Self {
        Self {
            version: RECORDS_VERSION,
            profiles: store
                .profiles()
                .into_iter()
                .map(StoredProfile::from_model)
                .collect(),
            events: store.events().iter().map(StoredEvent::from_model).collect(),
            appointments: store
                .appointments()
                .iter()
                .map(StoredAppointment::from_model)
                .collect(),
        }
    }
}

/// Tracks whether the last load operation succeeded for each records file.
/// This prevents data loss by blocking saves when the existing data could
/// not be read. Key is the file path.
static LOAD_STATE_MAP: OnceLock<Mutex<HashMap<String, LoadState>>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    /// Never attempted to load
    Uninitialized,
    /// Last load succeeded
    Success,
    /// Last load failed (deserialization error, corruption, etc.)
    Failed,
}

impl LoadState {
    fn get(key: &str) -> LoadState {
        let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
        *map.lock()
            .unwrap()
            .get(key)
            .unwrap_or(&LoadState::Uninitialized)
    }

    fn set(key: &str, state: LoadState) {
        let map = LOAD_STATE_MAP.get_or_init(|| Mutex::new(HashMap::new()));
        map.lock().unwrap().insert(key.to_string(), state);
    }
}

fn state_key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

pub struct LocalStorage;

impl LocalStorage {
    /// Helper to get a sidecar lock file path
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Check if the last load operation succeeded for the given file.
    ///
    /// Returns `true` if the load succeeded or none was attempted yet,
    /// `false` if the last load failed.
    pub fn can_save(path: &Path) -> bool {
        match LoadState::get(&state_key(path)) {
            LoadState::Uninitialized => true, // Allow save if never loaded
            LoadState::Success => true,
            LoadState::Failed => false,
        }
    }

    /// Load the record store from the records file.
    ///
    /// # Data Loss Prevention
    /// **Never** silently ignore errors from this function. A failed load
    /// marks the file via `LoadState`, which blocks `save` for the same
    /// file so a half-read roster cannot overwrite data on disk.
    pub fn load(ctx: &dyn AppContext) -> Result<RecordStore> {
        let path = ctx.get_records_file_path()?;
        if !path.exists() {
            LoadState::set(&state_key(&path), LoadState::Success);
            return Ok(RecordStore::new());
        }

        let result = Self::with_lock(&path, || {
            let json = fs::read_to_string(&path)?;
            let data: RecordsFileData = serde_json::from_str(&json)?;
            Self::rebuild(&data)
        });

        match &result {
            Ok(_) => LoadState::set(&state_key(&path), LoadState::Success),
            Err(_) => LoadState::set(&state_key(&path), LoadState::Failed),
        }
        result
    }

    /// Save the record store to the records file.
    ///
    /// # Data Loss Prevention
    /// This function checks `LoadState` before saving. If the last `load`
    /// of this file failed, this returns an error instead of overwriting
    /// the file with potentially incomplete data.
    pub fn save(ctx: &dyn AppContext, store: &RecordStore) -> Result<()> {
        let path = ctx.get_records_file_path()?;
        if !Self::can_save(&path) {
            log::warn!("refusing to overwrite {}", path.display());
            return Err(anyhow::anyhow!(
                "Cannot save {}: previous load failed. This prevents overwriting data that couldn't be read.",
                path.display()
            ));
        }
        Self::with_lock(&path, || {
            let data = RecordsFileData::from_store(store);
            let json = serde_json::to_string_pretty(&data)?;
            Self::atomic_write(&path, json)?;
            Ok(())
        })
    }

    /// Serialized form of the current records, exactly as `save` writes
    /// them. Loading first means a broken file surfaces as an error here
    /// rather than exporting garbage.
    pub fn export_string(ctx: &dyn AppContext) -> Result<String> {
        let store = Self::load(ctx)?;
        let data = RecordsFileData::from_store(&store);
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Rebuilds a store by replaying the stored records through the
    /// normal store operations, so a file on disk passes exactly the same
    /// validation as interactive input.
    fn rebuild(data: &RecordsFileData) -> Result<RecordStore> {
        if data.version != RECORDS_VERSION {
            anyhow::bail!(
                "Records file version {} is not supported (expected {})",
                data.version,
                RECORDS_VERSION
            );
        }

        let mut store = RecordStore::new();

        for stored in &data.profiles {
            let profile = stored.to_model()?;
            if store.has_profile(&profile) {
                anyhow::bail!(messages::MESSAGE_DUPLICATE_PROFILE);
            }
            if store.has_similar_email(&profile) {
                anyhow::bail!(messages::MESSAGE_SIMILAR_EMAIL);
            }
            if store.has_similar_phone(&profile) {
                anyhow::bail!(messages::MESSAGE_SIMILAR_PHONE);
            }
            if store.has_similar_telegram(&profile) {
                anyhow::bail!(messages::MESSAGE_SIMILAR_TELEGRAM);
            }
            store.add_profile(profile)?;
        }

        for stored in &data.events {
            let event = stored.to_model()?;
            let event_id = event.id();
            store.add_event(event)?;

            let mut attendees = Vec::new();
            for name in &stored.attendees {
                let id = ProfileId::new(Name::new(name)?);
                if store.find_profile(&id).is_none() {
                    anyhow::bail!("{}: {}", messages::MESSAGE_UNKNOWN_ATTENDEE, name);
                }
                attendees.push(id);
            }
            store.add_attendees(&event_id, &attendees)?;
        }

        for stored in &data.appointments {
            let patient = ProfileId::new(Name::new(&stored.patient)?);
            if store.find_profile(&patient).is_none() {
                anyhow::bail!("{}: {}", messages::MESSAGE_UNKNOWN_PATIENT, stored.patient);
            }
            let appointment = Appointment::new(
                Reason::new(&stored.reason)?,
                parse_date_time(&stored.date_time)?,
                stored.marked,
                patient,
            );
            store.book_appointment(appointment)?;
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;
    use serial_test::serial;
    use std::sync::Arc;
    use std::thread;

    fn make_profile(name: &str, phone: &str, email: &str) -> Profile {
        Profile::new(
            Name::new(name).unwrap(),
            Phone::new(phone).unwrap(),
            Email::new(email).unwrap(),
            Telegram::none(),
            BTreeSet::new(),
        )
    }

    fn make_event(title: &str, start: &str, end: &str) -> Event {
        Event::new(
            Title::new(title).unwrap(),
            parse_date_time(start).unwrap(),
            parse_date_time(end).unwrap(),
            BTreeSet::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_locking_concurrency() {
        let ctx = TestContext::new();
        let file_path = ctx.get_data_dir().unwrap().join("lock_test.txt");
        let path_ref = Arc::new(file_path.clone());

        let _ = fs::write(&file_path, "0");

        let mut handles = vec![];
        for _ in 0..10 {
            let p = path_ref.clone();
            handles.push(thread::spawn(move || {
                LocalStorage::with_lock(&p, || {
                    let content = fs::read_to_string(&*p).unwrap();
                    let num: i32 = content.parse().unwrap();
                    std::thread::sleep(std::time::Duration::from_millis(10));
                    fs::write(&*p, (num + 1).to_string()).unwrap();
                    Ok(())
                })
                .unwrap();
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "10");
    }

    #[test]
    #[serial]
    fn test_missing_file_loads_an_empty_store() {
        let ctx = TestContext::new();
        let store = LocalStorage::load(&ctx).unwrap();
        assert!(store.profiles().is_empty());
        assert!(store.events().is_empty());
        // A fresh path counts as a successful load, so saving is allowed.
        assert!(LocalStorage::can_save(&ctx.get_records_file_path().unwrap()));
    }

    #[test]
    #[serial]
    fn test_round_trip_preserves_attendance_and_appointments() {
        let ctx = TestContext::new();

        let mut store = RecordStore::new();
        store
            .add_profile(make_profile("Alice", "91234567", "alice@example.com"))
            .unwrap();
        store
            .add_event(make_event("Standup", "2022-10-12 09:00", "2022-10-12 09:30"))
            .unwrap();
        let alice = store.profiles()[0].id();
        let standup = store.events()[0].id();
        store
            .add_attendees(&standup, std::slice::from_ref(&alice))
            .unwrap();
        store
            .book_appointment(Appointment::new(
                Reason::new("Checkup").unwrap(),
                parse_date_time("2022-10-12 16:30").unwrap(),
                true,
                alice.clone(),
            ))
            .unwrap();

        LocalStorage::save(&ctx, &store).unwrap();
        let loaded = LocalStorage::load(&ctx).unwrap();

        assert!(loaded.is_consistent());
        assert_eq!(loaded.profiles().len(), 1);
        assert_eq!(loaded.events()[0].attendees().len(), 1);
        assert!(loaded.profiles()[0].attends(&standup));
        assert_eq!(loaded.appointments().len(), 1);
        assert!(loaded.appointments()[0].is_marked());
        assert_eq!(loaded.appointments()[0].patient(), &alice);
    }

    #[test]
    #[serial]
    fn test_unsupported_version_fails_and_blocks_save() {
        let ctx = TestContext::new();
        let path = ctx.get_records_file_path().unwrap();
        LocalStorage::atomic_write(
            &path,
            r#"{"version": 999, "profiles": [], "events": [], "appointments": []}"#,
        )
        .unwrap();

        let err = LocalStorage::load(&ctx).unwrap_err();
        assert!(err.to_string().contains("not supported"));

        let save_result = LocalStorage::save(&ctx, &RecordStore::new());
        assert!(save_result.is_err());
        assert!(
            save_result
                .unwrap_err()
                .to_string()
                .contains("previous load failed")
        );
    }

    #[test]
    #[serial]
    fn test_unknown_attendee_is_rejected() {
        let ctx = TestContext::new();
        let path = ctx.get_records_file_path().unwrap();
        let json = r#"{
  "version": 1,
  "profiles": [],
  "events": [
    {"title": "Standup", "start": "2022-10-12 09:00", "end": "2022-10-12 09:30", "attendees": ["Ghost"]}
  ],
  "appointments": []
}"#;
        LocalStorage::atomic_write(&path, json).unwrap();

        let err = LocalStorage::load(&ctx).unwrap_err();
        assert!(err.to_string().contains(messages::MESSAGE_UNKNOWN_ATTENDEE));
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    #[serial]
    fn test_similar_email_is_rejected() {
        let ctx = TestContext::new();
        let path = ctx.get_records_file_path().unwrap();
        let json = r#"{
  "version": 1,
  "profiles": [
    {"name": "Alice", "phone": "91234567", "email": "shared@example.com"},
    {"name": "Bob", "phone": "84712398", "email": "shared@example.com"}
  ],
  "events": [],
  "appointments": []
}"#;
        LocalStorage::atomic_write(&path, json).unwrap();

        let err = LocalStorage::load(&ctx).unwrap_err();
        assert_eq!(err.to_string(), messages::MESSAGE_SIMILAR_EMAIL);
    }

    #[test]
    #[serial]
    fn test_invalid_field_is_rejected_on_load() {
        let ctx = TestContext::new();
        let path = ctx.get_records_file_path().unwrap();
        let json = r#"{
  "version": 1,
  "profiles": [
    {"name": "Alice", "phone": "12", "email": "alice@example.com"}
  ],
  "events": [],
  "appointments": []
}"#;
        LocalStorage::atomic_write(&path, json).unwrap();

        let err = LocalStorage::load(&ctx).unwrap_err();
        assert!(err.to_string().contains("at least 3 digits"));
    }
}
