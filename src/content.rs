//! Content-generation collaborator
//!
//! The engine never inspects what this service returns; it only stores it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::planner::Subject;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content service unavailable: {0}")]
    Unavailable(String),
}

/// Front and back text of one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardContent {
    pub front: String,
    pub back: String,
}

pub trait ContentService: Send + Sync {
    fn flashcards(
        &self,
        subject: Subject,
        topic: &str,
        count: usize,
    ) -> Result<Vec<CardContent>, ContentError>;
}

/// Placeholder texts numbered per topic, used when no model is attached
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateContentService;

impl ContentService for TemplateContentService {
    fn flashcards(
        &self,
        _subject: Subject,
        topic: &str,
        count: usize,
    ) -> Result<Vec<CardContent>, ContentError> {
        Ok((1..=count)
            .map(|n| CardContent {
                front: format!("Question about {} - {}", topic, n),
                back: format!("Answer for {} question {}", topic, n),
            })
            .collect())
    }
}
