use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use super::{CardQuery, ItemQuery, Result, Storage, StorageError};
use crate::flashcards::Flashcard;
use crate::planner::{PlanItem, StudyPlan};
use crate::profile::Profile;
use crate::resources::Resource;

#[derive(Default)]
struct Tables {
    plans: HashMap<Uuid, StudyPlan>,
    plan_items: HashMap<Uuid, PlanItem>,
    flashcards: HashMap<Uuid, Flashcard>,
    profiles: HashMap<String, Profile>,
    resources: HashMap<Uuid, Resource>,
}

/// In-process storage guarded by a single lock
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StorageError::Poisoned)
    }
}

fn replace<K, V>(map: &mut HashMap<K, V>, key: K, value: V, collection: &'static str) -> Result<()>
where
    K: std::hash::Hash + Eq + ToString,
{
    match map.get_mut(&key) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(StorageError::RecordMissing {
            collection,
            id: key.to_string(),
        }),
    }
}

impl Storage for MemoryStorage {
    fn insert_plan(&self, plan: &StudyPlan) -> Result<()> {
        self.write()?.plans.insert(plan.id, plan.clone());
        Ok(())
    }

    fn get_plan(&self, id: Uuid) -> Result<Option<StudyPlan>> {
        Ok(self.read()?.plans.get(&id).cloned())
    }

    fn update_plan(&self, plan: &StudyPlan) -> Result<()> {
        replace(&mut self.write()?.plans, plan.id, plan.clone(), "plans")
    }

    fn insert_plan_items(&self, items: &[PlanItem]) -> Result<()> {
        let mut tables = self.write()?;
        for item in items {
            tables.plan_items.insert(item.id, item.clone());
        }
        Ok(())
    }

    fn get_plan_item(&self, id: Uuid) -> Result<Option<PlanItem>> {
        Ok(self.read()?.plan_items.get(&id).cloned())
    }

    fn swap_plan_item(&self, item: &PlanItem, expected_version: u64) -> Result<bool> {
        let mut tables = self.write()?;
        match tables.plan_items.get_mut(&item.id) {
            Some(current) if current.version == expected_version => {
                *current = item.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn query_plan_items(&self, user_id: &str, query: &ItemQuery) -> Result<Vec<PlanItem>> {
        let tables = self.read()?;
        let owned = tables
            .plan_items
            .values()
            .filter(|i| i.user_id == user_id)
            .cloned();
        Ok(query.apply(owned))
    }

    fn insert_flashcards(&self, cards: &[Flashcard]) -> Result<()> {
        let mut tables = self.write()?;
        for card in cards {
            tables.flashcards.insert(card.id, card.clone());
        }
        Ok(())
    }

    fn get_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>> {
        Ok(self.read()?.flashcards.get(&id).cloned())
    }

    fn update_flashcard(&self, card: &Flashcard) -> Result<()> {
        replace(&mut self.write()?.flashcards, card.id, card.clone(), "flashcards")
    }

    fn query_flashcards(&self, user_id: &str, query: &CardQuery) -> Result<Vec<Flashcard>> {
        let tables = self.read()?;
        let owned = tables
            .flashcards
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned();
        Ok(query.apply(owned))
    }

    fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        Ok(self.read()?.profiles.get(user_id).cloned())
    }

    fn put_profile(&self, profile: &Profile) -> Result<()> {
        self.write()?
            .profiles
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    fn swap_profile(&self, profile: &Profile, expected_version: u64) -> Result<bool> {
        let mut tables = self.write()?;
        match tables.profiles.get_mut(&profile.user_id) {
            Some(current) if current.version == expected_version => {
                *current = profile.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn insert_resource(&self, resource: &Resource) -> Result<()> {
        self.write()?.resources.insert(resource.id, resource.clone());
        Ok(())
    }

    fn get_resource(&self, id: Uuid) -> Result<Option<Resource>> {
        Ok(self.read()?.resources.get(&id).cloned())
    }

    fn update_resource(&self, resource: &Resource) -> Result<()> {
        replace(&mut self.write()?.resources, resource.id, resource.clone(), "resources")
    }

    fn list_resources(&self, user_id: &str) -> Result<Vec<Resource>> {
        let tables = self.read()?;
        let mut resources: Vec<Resource> = tables
            .resources
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        resources.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(resources)
    }
}
