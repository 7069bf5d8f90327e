//! Dashboard statistics derived from logged progress

mod aggregator;
mod models;

pub use aggregator::{completion_rate, subject_stats, AnalyticsAggregator};
pub use models::{DashboardStats, SubjectStats};
