//! JSON file storage
//!
//! Directory structure:
//! ```text
//! {base}/
//! ├── plans/{plan-id}.json
//! ├── plan_items/{item-id}.json
//! ├── flashcards/{card-id}.json
//! ├── profiles/{url-encoded-user-id}.json
//! └── resources/{resource-id}.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::{CardQuery, ItemQuery, Result, Storage, StorageError};
use crate::flashcards::Flashcard;
use crate::planner::{PlanItem, StudyPlan};
use crate::profile::Profile;
use crate::resources::Resource;

const PLANS: &str = "plans";
const PLAN_ITEMS: &str = "plan_items";
const FLASHCARDS: &str = "flashcards";
const PROFILES: &str = "profiles";
const RESOURCES: &str = "resources";

pub struct FileStorage {
    base_path: PathBuf,
    /// Serializes writes so read-compare-write on profiles is atomic
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("prep"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        for collection in [PLANS, PLAN_ITEMS, FLASHCARDS, PROFILES, RESOURCES] {
            fs::create_dir_all(self.base_path.join(collection))?;
        }
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| StorageError::Poisoned)
    }

    fn record_path(&self, collection: &str, key: &str) -> PathBuf {
        self.base_path
            .join(collection)
            .join(format!("{}.json", key))
    }

    fn profile_path(&self, user_id: &str) -> PathBuf {
        self.record_path(PROFILES, &urlencoding::encode(user_id))
    }

    fn read_record<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write through a sibling temp file and rename it into place, so readers
    /// that skip the write lock never see a partial record. Callers hold
    /// `write_lock`.
    fn write_record<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, serde_json::to_string_pretty(record)?)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn overwrite_record<T: Serialize>(
        &self,
        collection: &'static str,
        id: Uuid,
        record: &T,
    ) -> Result<()> {
        let path = self.record_path(collection, &id.to_string());
        let _guard = self.lock()?;
        if !path.exists() {
            return Err(StorageError::RecordMissing {
                collection,
                id: id.to_string(),
            });
        }
        self.write_record(&path, record)
    }

    /// Load every record in a collection directory
    fn list_records<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let dir = self.base_path.join(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                records.push(serde_json::from_str(&content)?);
            }
        }
        Ok(records)
    }
}

impl Storage for FileStorage {
    // ===== Plans =====

    fn insert_plan(&self, plan: &StudyPlan) -> Result<()> {
        let _guard = self.lock()?;
        self.write_record(&self.record_path(PLANS, &plan.id.to_string()), plan)
    }

    fn get_plan(&self, id: Uuid) -> Result<Option<StudyPlan>> {
        self.read_record(&self.record_path(PLANS, &id.to_string()))
    }

    fn update_plan(&self, plan: &StudyPlan) -> Result<()> {
        self.overwrite_record(PLANS, plan.id, plan)
    }

    // ===== Plan items =====

    fn insert_plan_items(&self, items: &[PlanItem]) -> Result<()> {
        let _guard = self.lock()?;
        for item in items {
            self.write_record(&self.record_path(PLAN_ITEMS, &item.id.to_string()), item)?;
        }
        Ok(())
    }

    fn get_plan_item(&self, id: Uuid) -> Result<Option<PlanItem>> {
        self.read_record(&self.record_path(PLAN_ITEMS, &id.to_string()))
    }

    fn swap_plan_item(&self, item: &PlanItem, expected_version: u64) -> Result<bool> {
        let path = self.record_path(PLAN_ITEMS, &item.id.to_string());
        let _guard = self.lock()?;
        let current: Option<PlanItem> = self.read_record(&path)?;
        match current {
            Some(current) if current.version == expected_version => {
                self.write_record(&path, item)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn query_plan_items(&self, user_id: &str, query: &ItemQuery) -> Result<Vec<PlanItem>> {
        let items: Vec<PlanItem> = self.list_records(PLAN_ITEMS)?;
        Ok(query.apply(items.into_iter().filter(|i| i.user_id == user_id)))
    }

    // ===== Flashcards =====

    fn insert_flashcards(&self, cards: &[Flashcard]) -> Result<()> {
        let _guard = self.lock()?;
        for card in cards {
            self.write_record(&self.record_path(FLASHCARDS, &card.id.to_string()), card)?;
        }
        Ok(())
    }

    fn get_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>> {
        self.read_record(&self.record_path(FLASHCARDS, &id.to_string()))
    }

    fn update_flashcard(&self, card: &Flashcard) -> Result<()> {
        self.overwrite_record(FLASHCARDS, card.id, card)
    }

    fn query_flashcards(&self, user_id: &str, query: &CardQuery) -> Result<Vec<Flashcard>> {
        let cards: Vec<Flashcard> = self.list_records(FLASHCARDS)?;
        Ok(query.apply(cards.into_iter().filter(|c| c.user_id == user_id)))
    }

    // ===== Profiles =====

    fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.read_record(&self.profile_path(user_id))
    }

    fn put_profile(&self, profile: &Profile) -> Result<()> {
        let _guard = self.lock()?;
        self.write_record(&self.profile_path(&profile.user_id), profile)
    }

    fn swap_profile(&self, profile: &Profile, expected_version: u64) -> Result<bool> {
        let path = self.profile_path(&profile.user_id);
        let _guard = self.lock()?;
        let current: Option<Profile> = self.read_record(&path)?;
        match current {
            Some(current) if current.version == expected_version => {
                self.write_record(&path, profile)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    // ===== Resources =====

    fn insert_resource(&self, resource: &Resource) -> Result<()> {
        let _guard = self.lock()?;
        self.write_record(&self.record_path(RESOURCES, &resource.id.to_string()), resource)
    }

    fn get_resource(&self, id: Uuid) -> Result<Option<Resource>> {
        self.read_record(&self.record_path(RESOURCES, &id.to_string()))
    }

    fn update_resource(&self, resource: &Resource) -> Result<()> {
        self.overwrite_record(RESOURCES, resource.id, resource)
    }

    fn list_resources(&self, user_id: &str) -> Result<Vec<Resource>> {
        let mut resources: Vec<Resource> = self
            .list_records::<Resource>(RESOURCES)?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        resources.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(resources)
    }
}
