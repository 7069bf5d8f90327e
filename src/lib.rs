//! Study scheduling and review engine for exam preparation
//!
//! Four components share injected collaborators ([`storage::Storage`],
//! [`clock::Clock`], [`content::ContentService`]):
//! - [`planner`] turns an exam date and daily hours into dated plan items
//! - [`progress`] records completion and credits the profile total
//! - [`flashcards`] schedules SM-2 reviews
//! - [`analytics`] summarizes logged history for the dashboard
//!
//! [`StudyEngine`] wires them together.

pub mod analytics;
pub mod clock;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod flashcards;
pub mod planner;
pub mod profile;
pub mod progress;
pub mod resources;
pub mod storage;

pub use engine::StudyEngine;
pub use error::{EngineError, Result};
