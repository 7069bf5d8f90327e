//! Storage wrapper that injects contention, for tests

use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use uuid::Uuid;

use super::{CardQuery, ItemQuery, MemoryStorage, Result, Storage};
use crate::flashcards::Flashcard;
use crate::planner::{PlanItem, StudyPlan};
use crate::profile::Profile;
use crate::resources::Resource;

/// [`MemoryStorage`] whose profile swaps can be made to lose and whose item
/// reads can be slowed down to widen race windows
#[derive(Default)]
pub struct FaultyStorage {
    pub inner: MemoryStorage,
    lost_profile_swaps: AtomicU32,
    item_read_delay: Option<Duration>,
}

impl FaultyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item_read_delay(mut self, delay: Duration) -> Self {
        self.item_read_delay = Some(delay);
        self
    }

    /// The next `count` profile swaps report a lost race
    pub fn lose_profile_swaps(&self, count: u32) {
        self.lost_profile_swaps.store(count, Ordering::SeqCst);
    }
}

impl Storage for FaultyStorage {
    fn insert_plan(&self, plan: &StudyPlan) -> Result<()> {
        self.inner.insert_plan(plan)
    }

    fn get_plan(&self, id: Uuid) -> Result<Option<StudyPlan>> {
        self.inner.get_plan(id)
    }

    fn update_plan(&self, plan: &StudyPlan) -> Result<()> {
        self.inner.update_plan(plan)
    }

    fn insert_plan_items(&self, items: &[PlanItem]) -> Result<()> {
        self.inner.insert_plan_items(items)
    }

    fn get_plan_item(&self, id: Uuid) -> Result<Option<PlanItem>> {
        let item = self.inner.get_plan_item(id);
        if let Some(delay) = self.item_read_delay {
            thread::sleep(delay);
        }
        item
    }

    fn swap_plan_item(&self, item: &PlanItem, expected_version: u64) -> Result<bool> {
        self.inner.swap_plan_item(item, expected_version)
    }

    fn query_plan_items(&self, user_id: &str, query: &ItemQuery) -> Result<Vec<PlanItem>> {
        self.inner.query_plan_items(user_id, query)
    }

    fn insert_flashcards(&self, cards: &[Flashcard]) -> Result<()> {
        self.inner.insert_flashcards(cards)
    }

    fn get_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>> {
        self.inner.get_flashcard(id)
    }

    fn update_flashcard(&self, card: &Flashcard) -> Result<()> {
        self.inner.update_flashcard(card)
    }

    fn query_flashcards(&self, user_id: &str, query: &CardQuery) -> Result<Vec<Flashcard>> {
        self.inner.query_flashcards(user_id, query)
    }

    fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.inner.get_profile(user_id)
    }

    fn put_profile(&self, profile: &Profile) -> Result<()> {
        self.inner.put_profile(profile)
    }

    fn swap_profile(&self, profile: &Profile, expected_version: u64) -> Result<bool> {
        let lost = self
            .lost_profile_swaps
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if lost {
            return Ok(false);
        }
        self.inner.swap_profile(profile, expected_version)
    }

    fn insert_resource(&self, resource: &Resource) -> Result<()> {
        self.inner.insert_resource(resource)
    }

    fn get_resource(&self, id: Uuid) -> Result<Option<Resource>> {
        self.inner.get_resource(id)
    }

    fn update_resource(&self, resource: &Resource) -> Result<()> {
        self.inner.update_resource(resource)
    }

    fn list_resources(&self, user_id: &str) -> Result<Vec<Resource>> {
        self.inner.list_resources(user_id)
    }
}
