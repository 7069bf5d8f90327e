use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

fn default_hours_per_day() -> Option<i32> {
    Some(6)
}

/// Per-user profile holding the study-minute aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_subject: Option<String>,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: Option<i32>,
    /// Maintained outside the engine; read-only here
    #[serde(default)]
    pub streak_count: u32,
    /// Only ever changed through credited deltas
    #[serde(default)]
    pub total_study_minutes: u64,
    /// Bumped on every write; guards compare-and-swap updates
    #[serde(default)]
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: String, name: String, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            name,
            exam_date: None,
            optional_subject: None,
            hours_per_day: default_hours_per_day(),
            streak_count: 0,
            total_study_minutes: 0,
            version: 0,
            updated_at: now,
        }
    }
}

/// Descriptive fields set by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSetup {
    pub name: String,
    pub exam_date: Option<NaiveDate>,
    pub optional_subject: Option<String>,
    pub hours_per_day: Option<i32>,
}
