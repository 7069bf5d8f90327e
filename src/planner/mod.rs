//! Study plan generation
//!
//! This module provides:
//! - The subject and status enumerations shared across the engine
//! - Per-subject topic curricula
//! - A pure scheduler from exam date and daily hours to dated sessions
//! - Plan persistence and end-date extension

pub mod curriculum;
pub mod generator;
pub mod models;

pub use generator::{schedule_sessions, PlanGenerator};
pub use models::*;
