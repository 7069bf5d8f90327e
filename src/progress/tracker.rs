//! Completion state of plan items and the study-minute credit they carry

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::ProgressConfig;
use crate::error::{EngineError, Result};
use crate::planner::{PlanItem, PlanItemStatus};
use crate::profile::ProfileManager;
use crate::storage::{ItemQuery, Storage};

/// Minutes an item contributes to the profile total in a given state
pub fn credited_minutes(status: PlanItemStatus, minutes: u32) -> u32 {
    match status {
        PlanItemStatus::Done => minutes,
        PlanItemStatus::Pending | PlanItemStatus::Skipped => 0,
    }
}

pub struct ProgressTracker {
    storage: Arc<dyn Storage>,
    profiles: Arc<ProfileManager>,
    config: ProgressConfig,
}

impl ProgressTracker {
    pub fn new(storage: Arc<dyn Storage>, profiles: Arc<ProfileManager>, config: ProgressConfig) -> Self {
        Self {
            storage,
            profiles,
            config,
        }
    }

    fn owned_item(&self, user_id: &str, item_id: Uuid) -> Result<PlanItem> {
        self.storage
            .get_plan_item(item_id)?
            .filter(|item| item.user_id == user_id)
            .ok_or_else(|| EngineError::not_found(format!("plan item {}", item_id)))
    }

    /// Read-modify-write of one item with optimistic concurrency. Returns the
    /// item as read and as written. `mutate` may run more than once.
    fn modify_item<F>(&self, user_id: &str, item_id: Uuid, mutate: F) -> Result<(PlanItem, PlanItem)>
    where
        F: Fn(&mut PlanItem) -> Result<()>,
    {
        let attempts = self.config.max_update_attempts.max(1);
        for attempt in 1..=attempts {
            let current = self.owned_item(user_id, item_id)?;
            let mut next = current.clone();
            mutate(&mut next)?;
            next.version = current.version + 1;

            if self.storage.swap_plan_item(&next, current.version)? {
                return Ok((current, next));
            }
            log::debug!(
                "Plan item {} changed underneath update (attempt {}/{})",
                item_id,
                attempt,
                attempts
            );
        }

        Err(EngineError::Conflict {
            user_id: user_id.to_string(),
            attempts,
        })
    }

    /// Record `minutes` and `status` against an item. The profile total moves
    /// by the difference between the new credit and the credit the item
    /// already holds, so re-logging is idempotent, also when concurrent.
    pub fn log_progress(
        &self,
        user_id: &str,
        item_id: Uuid,
        minutes: i32,
        status: PlanItemStatus,
    ) -> Result<PlanItem> {
        let minutes = u32::try_from(minutes)
            .map_err(|_| EngineError::invalid("minutes must not be negative"))?;
        let credit = credited_minutes(status, minutes);

        let item = self.owned_item(user_id, item_id)?;
        if credit != item.credited_minutes {
            // Fail before touching the item if there is nowhere to credit
            self.profiles.get(user_id)?;
        }

        // The item claims its credit before the total moves; a failed move
        // releases the claim again
        let (previous, logged) = self.modify_item(user_id, item_id, |item| {
            item.actual_minutes = minutes;
            item.status = status;
            item.credited_minutes = credit;
            Ok(())
        })?;
        let delta = credit as i64 - previous.credited_minutes as i64;

        if delta != 0 {
            if let Err(e) = self.profiles.apply_minutes_delta(user_id, delta) {
                self.release_credit(user_id, item_id, delta);
                return Err(e);
            }
        }

        log::info!(
            "Logged {} min on item {} ({} -> {}), credit {:+}",
            minutes,
            item_id,
            previous.status,
            status,
            delta
        );
        Ok(logged)
    }

    /// Take back `delta` claimed minutes that never reached the profile, so a
    /// retried log credits them
    fn release_credit(&self, user_id: &str, item_id: Uuid, delta: i64) {
        let released = self.modify_item(user_id, item_id, |item| {
            let remaining = (item.credited_minutes as i64 - delta).clamp(0, u32::MAX as i64);
            item.credited_minutes = remaining as u32;
            Ok(())
        });
        if let Err(e) = released {
            log::warn!(
                "Could not release credit {:+} on item {}: {}",
                delta,
                item_id,
                e
            );
        }
    }

    /// Items in creation order, optionally limited to one scheduled date
    pub fn list_items(&self, user_id: &str, date: Option<NaiveDate>) -> Result<Vec<PlanItem>> {
        let mut query = ItemQuery::default();
        if let Some(date) = date {
            query = query.on_date(date);
        }
        Ok(self.storage.query_plan_items(user_id, &query)?)
    }

    /// Move a pending item to another day
    pub fn reschedule_item(&self, user_id: &str, item_id: Uuid, date: NaiveDate) -> Result<PlanItem> {
        let (_, moved) = self.modify_item(user_id, item_id, |item| match item.status {
            PlanItemStatus::Pending => {
                item.date = date;
                Ok(())
            }
            PlanItemStatus::Done | PlanItemStatus::Skipped => Err(EngineError::invalid(format!(
                "item {} is already {}",
                item_id, item.status
            ))),
        })?;
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::ProfileConfig;
    use crate::planner::Subject;
    use crate::profile::ProfileSetup;
    use crate::storage::testing::FaultyStorage;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, Utc};
    use std::thread;

    struct Fixture {
        storage: Arc<dyn Storage>,
        profiles: Arc<ProfileManager>,
        tracker: ProgressTracker,
    }

    fn fixture(config: ProfileConfig) -> Fixture {
        fixture_on(Arc::new(MemoryStorage::new()), config)
    }

    fn fixture_on(storage: Arc<dyn Storage>, config: ProfileConfig) -> Fixture {
        let profiles = Arc::new(ProfileManager::new(
            storage.clone(),
            Arc::new(FixedClock::new(Utc::now())),
            config,
        ));
        profiles
            .setup(
                "u1",
                ProfileSetup {
                    name: "Kabir".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        let tracker = ProgressTracker::new(storage.clone(), profiles.clone(), ProgressConfig::default());
        Fixture {
            storage,
            profiles,
            tracker,
        }
    }

    fn insert_items(storage: &dyn Storage, user_id: &str, count: u32) -> Vec<PlanItem> {
        let plan_id = Uuid::new_v4();
        let now = Utc::now();
        let items: Vec<PlanItem> = (0..count)
            .map(|position| PlanItem {
                id: Uuid::new_v4(),
                plan_id,
                user_id: user_id.to_string(),
                date: now.date_naive() + Duration::days(position as i64),
                subject: Subject::Gs2,
                topic: "Polity".to_string(),
                target_minutes: 120,
                actual_minutes: 0,
                status: PlanItemStatus::Pending,
                position,
                credited_minutes: 0,
                version: 0,
                created_at: now,
            })
            .collect();
        storage.insert_plan_items(&items).unwrap();
        items
    }

    fn total(fixture: &Fixture) -> u64 {
        fixture.profiles.get("u1").unwrap().total_study_minutes
    }

    #[test]
    fn test_only_done_items_carry_credit() {
        assert_eq!(credited_minutes(PlanItemStatus::Done, 120), 120);
        assert_eq!(credited_minutes(PlanItemStatus::Pending, 120), 0);
        assert_eq!(credited_minutes(PlanItemStatus::Skipped, 40), 0);
    }

    #[test]
    fn test_relogging_done_credits_once() {
        let f = fixture(ProfileConfig::default());
        let items = insert_items(f.storage.as_ref(), "u1", 1);

        f.tracker.log_progress("u1", items[0].id, 120, PlanItemStatus::Done).unwrap();
        let item = f.tracker.log_progress("u1", items[0].id, 120, PlanItemStatus::Done).unwrap();

        assert_eq!(total(&f), 120);
        assert_eq!(item.credited_minutes, 120);
        assert_eq!(item.version, 2);
    }

    #[test]
    fn test_corrections_adjust_by_difference() {
        let f = fixture(ProfileConfig::default());
        let items = insert_items(f.storage.as_ref(), "u1", 1);
        let id = items[0].id;

        f.tracker.log_progress("u1", id, 100, PlanItemStatus::Done).unwrap();
        f.tracker.log_progress("u1", id, 130, PlanItemStatus::Done).unwrap();
        assert_eq!(total(&f), 130);

        let item = f.tracker.log_progress("u1", id, 0, PlanItemStatus::Skipped).unwrap();
        assert_eq!(item.status, PlanItemStatus::Skipped);
        assert_eq!(total(&f), 0);

        f.tracker.log_progress("u1", id, 45, PlanItemStatus::Done).unwrap();
        assert_eq!(total(&f), 45);
    }

    #[test]
    fn test_skipping_pending_item_credits_nothing() {
        let f = fixture(ProfileConfig::default());
        let items = insert_items(f.storage.as_ref(), "u1", 1);

        let item = f.tracker.log_progress("u1", items[0].id, 20, PlanItemStatus::Skipped).unwrap();
        assert_eq!(item.actual_minutes, 20);
        assert_eq!(item.credited_minutes, 0);
        assert_eq!(total(&f), 0);
    }

    #[test]
    fn test_negative_minutes_rejected() {
        let f = fixture(ProfileConfig::default());
        let items = insert_items(f.storage.as_ref(), "u1", 1);

        let err = f.tracker.log_progress("u1", items[0].id, -5, PlanItemStatus::Done).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_unknown_or_foreign_item_is_not_found() {
        let f = fixture(ProfileConfig::default());
        let foreign = insert_items(f.storage.as_ref(), "someone-else", 1);

        let err = f.tracker.log_progress("u1", Uuid::new_v4(), 10, PlanItemStatus::Done).unwrap_err();
        assert!(err.is_not_found());

        let err = f.tracker.log_progress("u1", foreign[0].id, 10, PlanItemStatus::Done).unwrap_err();
        assert!(err.is_not_found());
        let untouched = f.storage.get_plan_item(foreign[0].id).unwrap().unwrap();
        assert_eq!(untouched.status, PlanItemStatus::Pending);
    }

    #[test]
    fn test_missing_profile_leaves_item_untouched() {
        let f = fixture(ProfileConfig::default());
        let items = insert_items(f.storage.as_ref(), "no-profile", 1);

        let err = f
            .tracker
            .log_progress("no-profile", items[0].id, 60, PlanItemStatus::Done)
            .unwrap_err();
        assert!(err.is_not_found());
        let item = f.storage.get_plan_item(items[0].id).unwrap().unwrap();
        assert_eq!(item.status, PlanItemStatus::Pending);
        assert_eq!(item.version, 0);
    }

    #[test]
    fn test_conflict_then_retry_credits_exactly_once() {
        let storage = Arc::new(FaultyStorage::new());
        let f = fixture_on(storage.clone(), ProfileConfig::default());
        let items = insert_items(f.storage.as_ref(), "u1", 1);
        let id = items[0].id;

        storage.lose_profile_swaps(10);
        let err = f.tracker.log_progress("u1", id, 120, PlanItemStatus::Done).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(total(&f), 0);

        // The item keeps the logged state but holds no credit
        let item = f.storage.get_plan_item(id).unwrap().unwrap();
        assert_eq!(item.status, PlanItemStatus::Done);
        assert_eq!(item.credited_minutes, 0);

        f.tracker.log_progress("u1", id, 120, PlanItemStatus::Done).unwrap();
        assert_eq!(total(&f), 120);
        f.tracker.log_progress("u1", id, 120, PlanItemStatus::Done).unwrap();
        assert_eq!(total(&f), 120);
    }

    #[test]
    fn test_concurrent_identical_logs_on_one_item_credit_once() {
        let storage = Arc::new(FaultyStorage::new().with_item_read_delay(std::time::Duration::from_millis(30)));
        let f = fixture_on(storage, ProfileConfig::default());
        let items = insert_items(f.storage.as_ref(), "u1", 1);
        let id = items[0].id;
        let tracker = Arc::new(f.tracker);

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    tracker.log_progress("u1", id, 120, PlanItemStatus::Done).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(f.profiles.get("u1").unwrap().total_study_minutes, 120);
        let item = f.storage.get_plan_item(id).unwrap().unwrap();
        assert_eq!(item.credited_minutes, 120);
    }

    #[test]
    fn test_concurrent_logs_keep_exact_total() {
        let f = fixture(ProfileConfig {
            max_update_attempts: 1000,
        });
        let items = insert_items(f.storage.as_ref(), "u1", 8);
        let tracker = Arc::new(f.tracker);

        let handles: Vec<_> = items
            .iter()
            .map(|item| {
                let tracker = Arc::clone(&tracker);
                let id = item.id;
                thread::spawn(move || {
                    for _ in 0..5 {
                        tracker.log_progress("u1", id, 30, PlanItemStatus::Done).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(f.profiles.get("u1").unwrap().total_study_minutes, 8 * 30);
    }

    #[test]
    fn test_list_and_reschedule() {
        let f = fixture(ProfileConfig::default());
        let items = insert_items(f.storage.as_ref(), "u1", 3);

        let all = f.tracker.list_items("u1", None).unwrap();
        assert_eq!(all.len(), 3);

        let day = items[1].date;
        let on_day = f.tracker.list_items("u1", Some(day)).unwrap();
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].id, items[1].id);

        let moved_to = day + Duration::days(10);
        let moved = f.tracker.reschedule_item("u1", items[1].id, moved_to).unwrap();
        assert_eq!(moved.date, moved_to);
        assert_eq!(total(&f), 0);

        f.tracker.log_progress("u1", items[2].id, 60, PlanItemStatus::Done).unwrap();
        let err = f.tracker.reschedule_item("u1", items[2].id, moved_to).unwrap_err();
        assert!(err.is_invalid_input());
    }
}
