//! SM-2 Spaced Repetition Algorithm
//!
//! Quality ratings (0-5):
//! - 0: Complete blackout, no recall
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! Ratings below 3 are lapses and restart the card at a one-day interval.

use chrono::{DateTime, Duration, Utc};

use super::models::Flashcard;
use crate::error::{EngineError, Result};

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f32 = 1.3;

/// Longest interval a card can be given
pub const MAX_INTERVAL_DAYS: i32 = 36_500;

const PASSING_QUALITY: i32 = 3;

/// Result of calculating the next review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub interval_days: i32,
    pub ease: f32,
    pub reps: u32,
    pub next_review_at: DateTime<Utc>,
}

pub fn validate_quality(quality: i32) -> Result<i32> {
    if (0..=5).contains(&quality) {
        Ok(quality)
    } else {
        Err(EngineError::invalid(format!(
            "quality must be between 0 and 5, got {}",
            quality
        )))
    }
}

/// EF' = max(1.3, EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)))
pub fn next_ease(ease: f32, quality: i32) -> f32 {
    let miss = (5 - quality) as f32;
    (ease + (0.1 - miss * (0.08 + miss * 0.02))).max(MIN_EASE_FACTOR)
}

/// Calculate the next review for `card` rated `quality` at `now`
pub fn calculate_next_review(card: &Flashcard, quality: i32, now: DateTime<Utc>) -> Result<ReviewResult> {
    let quality = validate_quality(quality)?;
    let ease = next_ease(card.ease, quality);

    let (reps, interval_days) = if quality < PASSING_QUALITY {
        (0, 1)
    } else {
        let reps = card.reps + 1;
        let interval = match reps {
            1 => 1,
            2 => 6,
            _ => {
                let grown = (card.interval_days as f32 * ease).round();
                if grown >= MAX_INTERVAL_DAYS as f32 {
                    MAX_INTERVAL_DAYS
                } else {
                    (grown as i32).max(1)
                }
            }
        };
        (reps, interval)
    };

    Ok(ReviewResult {
        interval_days,
        ease,
        reps,
        next_review_at: now + Duration::days(interval_days as i64),
    })
}

/// Interval each quality rating 0..=5 would give, indexed by rating
pub fn preview_intervals(card: &Flashcard, now: DateTime<Utc>) -> [i32; 6] {
    let mut intervals = [1; 6];
    for (quality, slot) in intervals.iter_mut().enumerate() {
        if let Ok(result) = calculate_next_review(card, quality as i32, now) {
            *slot = result.interval_days;
        }
    }
    intervals
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: i32) -> String {
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_card() -> Flashcard {
        Flashcard::new("u1".to_string(), "Q".to_string(), "A".to_string(), Utc::now())
    }

    fn apply(card: &mut Flashcard, quality: i32, now: DateTime<Utc>) {
        let result = calculate_next_review(card, quality, now).unwrap();
        card.ease = result.ease;
        card.interval_days = result.interval_days;
        card.reps = result.reps;
        card.next_review_at = result.next_review_at;
    }

    #[test]
    fn test_three_perfect_reviews() {
        let now = Utc::now();
        let mut card = new_card();

        apply(&mut card, 5, now);
        assert_eq!(card.reps, 1);
        assert_eq!(card.interval_days, 1);
        assert!((card.ease - 2.6).abs() < 1e-4);

        apply(&mut card, 5, now);
        assert_eq!(card.reps, 2);
        assert_eq!(card.interval_days, 6);

        apply(&mut card, 5, now);
        assert_eq!(card.reps, 3);
        // ease is now 2.8: round(6 * 2.8) = 17
        assert!((card.ease - 2.8).abs() < 1e-4);
        assert_eq!(card.interval_days, 17);
        assert_eq!(card.next_review_at, now + Duration::days(17));
    }

    #[test]
    fn test_subsequent_review_uses_updated_ease() {
        let mut card = new_card();
        card.reps = 5;
        card.interval_days = 10;
        card.ease = 2.5;

        // q=4 leaves ease unchanged: 10 * 2.5 = 25
        let result = calculate_next_review(&card, 4, Utc::now()).unwrap();
        assert_eq!(result.interval_days, 25);
        assert_eq!(result.reps, 6);
    }

    #[test]
    fn test_lapse_resets_regardless_of_state() {
        for (reps, interval) in [(0, 1), (2, 6), (9, 400)] {
            let mut card = new_card();
            card.reps = reps;
            card.interval_days = interval;

            let result = calculate_next_review(&card, 2, Utc::now()).unwrap();
            assert_eq!(result.reps, 0);
            assert_eq!(result.interval_days, 1);
        }
    }

    #[test]
    fn test_ease_factor_minimum() {
        let now = Utc::now();
        let mut card = new_card();
        for quality in [0, 1, 0, 2, 0, 0, 3, 0, 1, 0] {
            apply(&mut card, quality, now);
            assert!(card.ease >= MIN_EASE_FACTOR);
        }
        assert_eq!(card.ease, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_passing_reviews_never_shrink_interval() {
        let now = Utc::now();
        let mut card = new_card();
        card.ease = MIN_EASE_FACTOR;
        let mut intervals = Vec::new();
        for quality in [3, 3, 3, 4, 3, 5, 3, 3] {
            apply(&mut card, quality, now);
            intervals.push(card.interval_days);
        }
        for pair in intervals[1..].windows(2) {
            assert!(pair[1] >= pair[0], "intervals shrank: {:?}", intervals);
        }
    }

    #[test]
    fn test_interval_is_capped() {
        let mut card = new_card();
        card.reps = 30;
        card.interval_days = MAX_INTERVAL_DAYS - 1;
        card.ease = 2.5;

        let result = calculate_next_review(&card, 5, Utc::now()).unwrap();
        assert_eq!(result.interval_days, MAX_INTERVAL_DAYS);
    }

    #[test]
    fn test_quality_out_of_range() {
        let card = new_card();
        assert!(calculate_next_review(&card, 6, Utc::now()).unwrap_err().is_invalid_input());
        assert!(calculate_next_review(&card, -1, Utc::now()).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_preview_intervals() {
        let mut card = new_card();
        card.reps = 2;
        card.interval_days = 6;
        let preview = preview_intervals(&card, Utc::now());
        assert_eq!(&preview[..3], &[1, 1, 1]);
        assert!(preview[5] >= preview[3]);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(5), "5d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(30), "1mo");
        assert_eq!(format_interval(90), "3mo");
        assert_eq!(format_interval(365), "1y");
        assert_eq!(format_interval(730), "2y");
    }
}
