//! Turns an exam date and a daily time budget into dated study sessions

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::PlannerConfig;
use crate::error::{EngineError, Result};
use crate::storage::Storage;

use super::curriculum::topic_for_day;
use super::models::{GeneratedPlan, PlanItem, PlanItemStatus, PlanRequest, ScheduledSession, StudyPlan};

/// Schedule one session per day from `today`, for at most `max_horizon_days`
/// days and never on or past the exam date.
///
/// Subjects rotate strictly in the given order. Each session gets
/// `hours_per_day * 60 / subjects` minutes; the remainder is dropped.
/// `weak_areas` does not influence the result.
pub fn schedule_sessions(
    request: &PlanRequest,
    today: NaiveDate,
    max_horizon_days: u32,
) -> Result<Vec<ScheduledSession>> {
    if request.hours_per_day <= 0 {
        return Err(EngineError::invalid("hours per day must be positive"));
    }
    if request.subjects.is_empty() {
        return Err(EngineError::invalid("at least one subject is required"));
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = request.subjects.iter().find(|s| !seen.insert(**s)) {
        return Err(EngineError::invalid(format!(
            "subject {} listed more than once",
            duplicate
        )));
    }

    let days_until_exam = (request.exam_date - today).num_days();
    if days_until_exam <= 0 {
        return Err(EngineError::invalid("exam date must be in the future"));
    }

    let horizon = days_until_exam.min(max_horizon_days as i64) as usize;
    let subject_count = request.subjects.len() as i64;
    let target_minutes = u32::try_from(request.hours_per_day as i64 * 60 / subject_count)
        .map_err(|_| EngineError::invalid("hours per day is too large"))?;

    let sessions = (0..horizon)
        .map(|day| {
            let subject = request.subjects[day % request.subjects.len()];
            ScheduledSession {
                date: today + Duration::days(day as i64),
                subject,
                topic: topic_for_day(subject, day).to_string(),
                target_minutes,
            }
        })
        .collect();

    Ok(sessions)
}

/// Generates and persists study plans
pub struct PlanGenerator {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    config: PlannerConfig,
}

impl PlanGenerator {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, config: PlannerConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    pub fn generate(&self, user_id: &str, request: &PlanRequest) -> Result<GeneratedPlan> {
        let now = self.clock.now();
        let today = now.date_naive();
        let sessions = schedule_sessions(request, today, self.config.max_horizon_days)?;

        if !request.weak_areas.is_empty() {
            log::debug!(
                "Ignoring {} weak areas for {}; weighting is not applied",
                request.weak_areas.len(),
                user_id
            );
        }

        let plan = StudyPlan {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: format!("UPSC Study Plan - {}", today.format("%B %Y")),
            start_date: today,
            end_date: request.exam_date,
            created_at: now,
        };

        let items: Vec<PlanItem> = sessions
            .into_iter()
            .enumerate()
            .map(|(position, session)| PlanItem {
                id: Uuid::new_v4(),
                plan_id: plan.id,
                user_id: user_id.to_string(),
                date: session.date,
                subject: session.subject,
                topic: session.topic,
                target_minutes: session.target_minutes,
                actual_minutes: 0,
                status: PlanItemStatus::Pending,
                position: position as u32,
                credited_minutes: 0,
                version: 0,
                created_at: now,
            })
            .collect();

        self.storage.insert_plan(&plan)?;
        self.storage.insert_plan_items(&items)?;

        log::info!(
            "Generated plan {} for {} with {} items",
            plan.id,
            user_id,
            items.len()
        );

        Ok(GeneratedPlan { plan, items })
    }

    pub fn get_plan(&self, user_id: &str, plan_id: Uuid) -> Result<StudyPlan> {
        self.storage
            .get_plan(plan_id)?
            .filter(|p| p.user_id == user_id)
            .ok_or_else(|| EngineError::not_found(format!("plan {}", plan_id)))
    }

    /// Push a plan's end date later. Shortening a plan is rejected.
    pub fn extend_plan(&self, user_id: &str, plan_id: Uuid, end_date: NaiveDate) -> Result<StudyPlan> {
        let mut plan = self.get_plan(user_id, plan_id)?;
        if end_date < plan.end_date {
            return Err(EngineError::invalid(format!(
                "new end date {} is before current end date {}",
                end_date, plan.end_date
            )));
        }
        plan.end_date = end_date;
        self.storage.update_plan(&plan)?;
        Ok(plan)
    }
}
