use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::planner::{PlanItem, PlanItemStatus, Subject};
use crate::storage::{ItemQuery, Storage};

use super::models::{DashboardStats, SubjectStats};

/// Read-only reduction of a user's plan items and profile
pub struct AnalyticsAggregator {
    storage: Arc<dyn Storage>,
    config: AnalyticsConfig,
}

impl AnalyticsAggregator {
    pub fn new(storage: Arc<dyn Storage>, config: AnalyticsConfig) -> Self {
        Self { storage, config }
    }

    pub fn get_dashboard(&self, user_id: &str) -> Result<DashboardStats> {
        let streak_count = self
            .storage
            .get_profile(user_id)?
            .map(|p| p.streak_count)
            .unwrap_or(0);

        let recent_done = self.storage.query_plan_items(
            user_id,
            &ItemQuery::default()
                .with_status(PlanItemStatus::Done)
                .newest_first()
                .limit(self.config.recency_window),
        )?;
        let all_items = self.storage.query_plan_items(user_id, &ItemQuery::default())?;

        let total_study_minutes = total_minutes(&recent_done);

        Ok(DashboardStats {
            total_study_minutes,
            streak_count,
            completion_rate: completion_rate(&all_items),
            subject_stats: subject_stats(&recent_done),
            weekly_minutes: [total_study_minutes / 7; 7],
        })
    }
}

fn total_minutes(items: &[PlanItem]) -> u64 {
    items.iter().map(|i| i.actual_minutes as u64).sum()
}

/// Done items as a percentage of all items; zero when there are none
pub fn completion_rate(items: &[PlanItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    let done = items
        .iter()
        .filter(|i| i.status == PlanItemStatus::Done)
        .count();
    done as f64 / items.len() as f64 * 100.0
}

pub fn subject_stats(items: &[PlanItem]) -> BTreeMap<Subject, SubjectStats> {
    let mut stats: BTreeMap<Subject, SubjectStats> = BTreeMap::new();
    for item in items {
        let entry = stats.entry(item.subject).or_default();
        entry.minutes += item.actual_minutes as u64;
        entry.total += 1;
        match item.status {
            PlanItemStatus::Done => entry.completed += 1,
            PlanItemStatus::Pending | PlanItemStatus::Skipped => {}
        }
    }
    stats
}
