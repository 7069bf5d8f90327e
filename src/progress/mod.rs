//! Progress logging against plan items

pub mod tracker;

pub use tracker::{credited_minutes, ProgressTracker};
