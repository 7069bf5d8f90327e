//! Data models for study plans

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// Exam paper a study session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Gs1,
    Gs2,
    Gs3,
    Gs4,
    Essay,
    Optional,
    Csat,
}

impl Subject {
    pub const ALL: [Subject; 7] = [
        Subject::Gs1,
        Subject::Gs2,
        Subject::Gs3,
        Subject::Gs4,
        Subject::Essay,
        Subject::Optional,
        Subject::Csat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Gs1 => "gs1",
            Subject::Gs2 => "gs2",
            Subject::Gs3 => "gs3",
            Subject::Gs4 => "gs4",
            Subject::Essay => "essay",
            Subject::Optional => "optional",
            Subject::Csat => "csat",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == lower)
            .ok_or_else(|| EngineError::invalid(format!("unknown subject '{}'", s)))
    }
}

/// Completion state of a plan item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanItemStatus {
    #[default]
    Pending,
    Done,
    Skipped,
}

impl PlanItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanItemStatus::Pending => "pending",
            PlanItemStatus::Done => "done",
            PlanItemStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for PlanItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanItemStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PlanItemStatus::Pending),
            "done" => Ok(PlanItemStatus::Done),
            "skipped" => Ok(PlanItemStatus::Skipped),
            _ => Err(EngineError::invalid(format!("unknown status '{}'", s))),
        }
    }
}

/// A generated study plan. Only `end_date` may change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// One scheduled study session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub user_id: String,
    pub date: NaiveDate,
    pub subject: Subject,
    pub topic: String,
    /// Always positive
    pub target_minutes: u32,
    #[serde(default)]
    pub actual_minutes: u32,
    #[serde(default)]
    pub status: PlanItemStatus,
    /// Day index within the plan; orders items created in the same instant
    #[serde(default)]
    pub position: u32,
    /// Minutes this item has claimed in the profile total
    #[serde(default)]
    pub credited_minutes: u32,
    /// Bumped on every write; guards compare-and-swap updates
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
}

/// Input to plan generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub exam_date: NaiveDate,
    pub hours_per_day: i32,
    pub subjects: Vec<Subject>,
    /// Accepted for forward compatibility; does not affect scheduling
    #[serde(default)]
    pub weak_areas: Vec<String>,
}

impl PlanRequest {
    pub fn new(exam_date: NaiveDate, hours_per_day: i32, subjects: Vec<Subject>) -> Self {
        Self {
            exam_date,
            hours_per_day,
            subjects,
            weak_areas: Vec::new(),
        }
    }

    pub fn with_weak_areas(mut self, weak_areas: Vec<String>) -> Self {
        self.weak_areas = weak_areas;
        self
    }
}

/// A dated session before it is bound to a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSession {
    pub date: NaiveDate,
    pub subject: Subject,
    pub topic: String,
    pub target_minutes: u32,
}

/// Result of plan generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    pub plan: StudyPlan,
    pub items: Vec<PlanItem>,
}

impl GeneratedPlan {
    pub fn plan_id(&self) -> Uuid {
        self.plan.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_parse() {
        assert_eq!("GS3".parse::<Subject>().unwrap(), Subject::Gs3);
        assert_eq!(" essay ".parse::<Subject>().unwrap(), Subject::Essay);
        assert!("gs9".parse::<Subject>().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&PlanItemStatus::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");
        assert_eq!("Done".parse::<PlanItemStatus>().unwrap(), PlanItemStatus::Done);
    }
}
