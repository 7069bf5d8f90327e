//! Flashcard and spaced repetition system
//!
//! This module provides:
//! - The flashcard record with its review state
//! - SM-2 spaced repetition algorithm
//! - Review recording, due-card selection and card creation

pub mod algorithm;
pub mod models;
pub mod scheduler;

pub use models::*;
pub use scheduler::ReviewScheduler;
