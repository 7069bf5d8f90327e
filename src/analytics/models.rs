use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::planner::Subject;

/// Per-subject totals within the recency window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub minutes: u64,
    pub completed: u32,
    pub total: u32,
}

/// Dashboard numbers for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Minutes over the most recent completed items only
    pub total_study_minutes: u64,
    pub streak_count: u32,
    /// Percentage of all items marked done, 0-100
    pub completion_rate: f64,
    /// Same window as `total_study_minutes`
    pub subject_stats: BTreeMap<Subject, SubjectStats>,
    /// Even split of `total_study_minutes`, not a per-day histogram
    pub weekly_minutes: [u64; 7],
}
