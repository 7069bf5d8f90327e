//! Review scheduling over stored flashcards

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::algorithm::{calculate_next_review, preview_intervals, ReviewResult};
use super::models::Flashcard;
use crate::clock::Clock;
use crate::config::ReviewConfig;
use crate::content::ContentService;
use crate::error::{EngineError, Result};
use crate::planner::Subject;
use crate::storage::{CardQuery, Storage};

/// Most cards a single generation request may create
pub const MAX_CARDS_PER_REQUEST: usize = 50;

pub struct ReviewScheduler {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    config: ReviewConfig,
}

impl ReviewScheduler {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, config: ReviewConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    fn owned_card(&self, user_id: &str, card_id: Uuid) -> Result<Flashcard> {
        self.storage
            .get_flashcard(card_id)?
            .filter(|card| card.user_id == user_id)
            .ok_or_else(|| EngineError::not_found(format!("flashcard {}", card_id)))
    }

    /// Apply a review rated `quality` (0-5) at the current time
    pub fn record_review(&self, user_id: &str, card_id: Uuid, quality: i32) -> Result<Flashcard> {
        let mut card = self.owned_card(user_id, card_id)?;

        let ReviewResult {
            interval_days,
            ease,
            reps,
            next_review_at,
        } = calculate_next_review(&card, quality, self.clock.now())?;

        card.interval_days = interval_days;
        card.ease = ease;
        card.reps = reps;
        card.next_review_at = next_review_at;
        self.storage.update_flashcard(&card)?;

        log::info!(
            "Reviewed card {} with quality {}: next in {}d (ease {:.2})",
            card_id,
            quality,
            interval_days,
            ease
        );
        Ok(card)
    }

    /// Cards due at `now`, earliest first. A missing or non-positive limit
    /// falls back to the configured default.
    pub fn get_due_cards(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        limit: Option<i32>,
    ) -> Result<Vec<Flashcard>> {
        let limit = match limit {
            Some(limit) if limit > 0 => limit as usize,
            _ => self.config.default_due_limit,
        };
        let query = CardQuery::due_at(now).limit(limit);
        Ok(self.storage.query_flashcards(user_id, &query)?)
    }

    /// Intervals each quality rating 0..=5 would give the card now
    pub fn preview(&self, user_id: &str, card_id: Uuid) -> Result<[i32; 6]> {
        let card = self.owned_card(user_id, card_id)?;
        Ok(preview_intervals(&card, self.clock.now()))
    }

    /// Create `count` cards on a topic from the content service, due now
    pub fn create_cards(
        &self,
        user_id: &str,
        content: &dyn ContentService,
        subject: Subject,
        topic: &str,
        count: usize,
    ) -> Result<Vec<Flashcard>> {
        if topic.trim().is_empty() {
            return Err(EngineError::invalid("topic must not be empty"));
        }
        if count == 0 || count > MAX_CARDS_PER_REQUEST {
            return Err(EngineError::invalid(format!(
                "card count must be between 1 and {}",
                MAX_CARDS_PER_REQUEST
            )));
        }

        let now = self.clock.now();
        let cards: Vec<Flashcard> = content
            .flashcards(subject, topic, count)?
            .into_iter()
            .map(|c| Flashcard::new(user_id.to_string(), c.front, c.back, now).with_subject(subject))
            .collect();

        self.storage.insert_flashcards(&cards)?;
        log::info!("Created {} {} cards on '{}' for {}", cards.len(), subject, topic, user_id);
        Ok(cards)
    }
}
