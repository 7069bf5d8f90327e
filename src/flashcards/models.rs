//! Data models for the flashcard system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::planner::Subject;

fn default_ease() -> f32 {
    2.5
}

fn default_interval_days() -> i32 {
    1
}

/// A flashcard with question (front) and answer (back) and its review state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub user_id: String,
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    /// SM-2 ease factor, never below 1.3
    #[serde(default = "default_ease")]
    pub ease: f32,
    /// Days until the next review, at least 1
    #[serde(default = "default_interval_days")]
    pub interval_days: i32,
    /// Consecutive successful reviews
    #[serde(default)]
    pub reps: u32,
    pub next_review_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Flashcard {
    /// New card, due immediately
    pub fn new(user_id: String, front: String, back: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            front,
            back,
            subject: None,
            ease: default_ease(),
            interval_days: default_interval_days(),
            reps: 0,
            next_review_at: now,
            created_at: now,
        }
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}
