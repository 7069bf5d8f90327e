//! Persistence collaborator
//!
//! The engine talks to persistence only through the [`Storage`] trait.
//! [`FileStorage`] keeps one JSON file per record; [`MemoryStorage`] keeps
//! everything in process.

mod file_storage;
mod memory;
#[cfg(test)]
pub(crate) mod testing;

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::flashcards::Flashcard;
use crate::planner::{PlanItem, PlanItemStatus, StudyPlan};
use crate::profile::Profile;
use crate::resources::Resource;

pub use file_storage::FileStorage;
pub use memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Record {id} missing from {collection}")]
    RecordMissing { collection: &'static str, id: String },

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Sort order for plan item queries, by `(created_at, position)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemOrder {
    #[default]
    Oldest,
    Newest,
}

/// Filter, order and limit for plan item lookups
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub status: Option<PlanItemStatus>,
    pub date: Option<NaiveDate>,
    pub plan_id: Option<Uuid>,
    pub order: ItemOrder,
    pub limit: Option<usize>,
}

impl ItemQuery {
    pub fn with_status(mut self, status: PlanItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn in_plan(mut self, plan_id: Uuid) -> Self {
        self.plan_id = Some(plan_id);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = ItemOrder::Newest;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, item: &PlanItem) -> bool {
        self.status.map_or(true, |s| item.status == s)
            && self.date.map_or(true, |d| item.date == d)
            && self.plan_id.map_or(true, |p| item.plan_id == p)
    }

    /// Filter, sort and truncate an owner's items
    pub fn apply(&self, items: impl IntoIterator<Item = PlanItem>) -> Vec<PlanItem> {
        let mut matched: Vec<PlanItem> = items.into_iter().filter(|i| self.matches(i)).collect();
        matched.sort_by(|a, b| {
            let ord = recency_key(a).cmp(&recency_key(b));
            match self.order {
                ItemOrder::Oldest => ord,
                ItemOrder::Newest => ord.reverse(),
            }
        });
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

fn recency_key(item: &PlanItem) -> (DateTime<Utc>, u32, Uuid) {
    (item.created_at, item.position, item.id)
}

/// Due filter and limit for flashcard lookups; results are earliest-due first
#[derive(Debug, Clone, Default)]
pub struct CardQuery {
    /// Only cards with `next_review_at <= due_at`
    pub due_at: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl CardQuery {
    pub fn due_at(now: DateTime<Utc>) -> Self {
        Self {
            due_at: Some(now),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn apply(&self, cards: impl IntoIterator<Item = Flashcard>) -> Vec<Flashcard> {
        let mut matched: Vec<Flashcard> = cards
            .into_iter()
            .filter(|c| self.due_at.map_or(true, |now| c.next_review_at <= now))
            .collect();
        matched.sort_by(compare_due);
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

fn compare_due(a: &Flashcard, b: &Flashcard) -> Ordering {
    a.next_review_at
        .cmp(&b.next_review_at)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Record store used by the engine
///
/// `get_*` return `Ok(None)` for unknown ids; `update_*` on an unknown id is
/// a [`StorageError::RecordMissing`]. Plan items and profiles carry a
/// `version` and are only rewritten through `swap_*`.
pub trait Storage: Send + Sync {
    fn insert_plan(&self, plan: &StudyPlan) -> Result<()>;
    fn get_plan(&self, id: Uuid) -> Result<Option<StudyPlan>>;
    fn update_plan(&self, plan: &StudyPlan) -> Result<()>;

    fn insert_plan_items(&self, items: &[PlanItem]) -> Result<()>;
    fn get_plan_item(&self, id: Uuid) -> Result<Option<PlanItem>>;
    /// Write `item` only if the stored version still equals
    /// `expected_version`. Returns false on a lost race or a missing item.
    fn swap_plan_item(&self, item: &PlanItem, expected_version: u64) -> Result<bool>;
    fn query_plan_items(&self, user_id: &str, query: &ItemQuery) -> Result<Vec<PlanItem>>;

    fn insert_flashcards(&self, cards: &[Flashcard]) -> Result<()>;
    fn get_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>>;
    fn update_flashcard(&self, card: &Flashcard) -> Result<()>;
    fn query_flashcards(&self, user_id: &str, query: &CardQuery) -> Result<Vec<Flashcard>>;

    fn get_profile(&self, user_id: &str) -> Result<Option<Profile>>;
    /// Unconditional write, used for creating a profile
    fn put_profile(&self, profile: &Profile) -> Result<()>;
    /// Write `profile` only if the stored version still equals
    /// `expected_version`. Returns false when another writer got there first
    /// or the profile does not exist.
    fn swap_profile(&self, profile: &Profile, expected_version: u64) -> Result<bool>;

    fn insert_resource(&self, resource: &Resource) -> Result<()>;
    fn get_resource(&self, id: Uuid) -> Result<Option<Resource>>;
    fn update_resource(&self, resource: &Resource) -> Result<()>;
    /// Newest first
    fn list_resources(&self, user_id: &str) -> Result<Vec<Resource>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::Subject;
    use chrono::Duration;

    fn item(position: u32, status: PlanItemStatus, created_at: DateTime<Utc>) -> PlanItem {
        PlanItem {
            id: Uuid::new_v4(),
            plan_id: Uuid::nil(),
            user_id: "u1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + Duration::days(position as i64),
            subject: Subject::Gs1,
            topic: "History".to_string(),
            target_minutes: 60,
            actual_minutes: 0,
            status,
            position,
            credited_minutes: 0,
            version: 0,
            created_at,
        }
    }

    #[test]
    fn test_item_query_orders_by_creation_then_position() {
        let t0 = Utc::now();
        let t1 = t0 + Duration::seconds(5);
        let items = vec![
            item(1, PlanItemStatus::Done, t0),
            item(0, PlanItemStatus::Done, t1),
            item(0, PlanItemStatus::Done, t0),
            item(2, PlanItemStatus::Pending, t0),
        ];

        let newest = ItemQuery::default()
            .with_status(PlanItemStatus::Done)
            .newest_first()
            .limit(2)
            .apply(items.clone());
        assert_eq!(newest.len(), 2);
        assert_eq!((newest[0].created_at, newest[0].position), (t1, 0));
        assert_eq!((newest[1].created_at, newest[1].position), (t0, 1));

        let oldest = ItemQuery::default().apply(items);
        let positions: Vec<u32> = oldest.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 0]);
    }
}
