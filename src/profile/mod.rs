//! User profile and the cumulative study-minute aggregate

mod manager;
mod models;

pub use manager::ProfileManager;
pub use models::{Profile, ProfileSetup};
