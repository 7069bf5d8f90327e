//! Static topic lists per subject

use super::models::Subject;

/// Topic used for subjects without a defined curriculum
pub const GENERAL_STUDY: &str = "General Study";

const GENERAL_CURRICULUM: &[&str] = &[GENERAL_STUDY];

/// Ordered topics studied for a subject
pub fn curriculum(subject: Subject) -> &'static [&'static str] {
    match subject {
        Subject::Gs1 => &["Indian Heritage", "History", "Geography", "Society"],
        Subject::Gs2 => &["Governance", "Constitution", "Polity", "Social Justice"],
        Subject::Gs3 => &["Economy", "Environment", "Security", "Technology"],
        Subject::Gs4 => &["Ethics", "Integrity", "Case Studies", "Applications"],
        Subject::Essay => &["Essay Writing", "Current Topics", "Practice"],
        Subject::Csat => &["Quantitative", "Reasoning", "Comprehension"],
        // Content depends on the candidate's chosen optional paper
        Subject::Optional => GENERAL_CURRICULUM,
    }
}

/// Topic for a subject on the given global day index
pub fn topic_for_day(subject: Subject, day_index: usize) -> &'static str {
    let topics = curriculum(subject);
    topics[day_index % topics.len()]
}
