//! Entry point wiring the scheduling components to their collaborators

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::analytics::{AnalyticsAggregator, DashboardStats};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::content::ContentService;
use crate::error::Result;
use crate::flashcards::{Flashcard, ReviewScheduler};
use crate::planner::{GeneratedPlan, PlanGenerator, PlanItem, PlanItemStatus, PlanRequest, StudyPlan, Subject};
use crate::profile::{Profile, ProfileManager, ProfileSetup};
use crate::progress::ProgressTracker;
use crate::resources::ResourceProcessor;
use crate::storage::Storage;

pub struct StudyEngine {
    clock: Arc<dyn Clock>,
    content: Arc<dyn ContentService>,
    profiles: Arc<ProfileManager>,
    planner: PlanGenerator,
    progress: ProgressTracker,
    reviews: ReviewScheduler,
    analytics: AnalyticsAggregator,
    resources: ResourceProcessor,
}

impl StudyEngine {
    pub fn new(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        content: Arc<dyn ContentService>,
        config: EngineConfig,
    ) -> Self {
        let profiles = Arc::new(ProfileManager::new(
            Arc::clone(&storage),
            Arc::clone(&clock),
            config.profile,
        ));

        Self {
            planner: PlanGenerator::new(Arc::clone(&storage), Arc::clone(&clock), config.planner),
            progress: ProgressTracker::new(
                Arc::clone(&storage),
                Arc::clone(&profiles),
                config.progress,
            ),
            reviews: ReviewScheduler::new(Arc::clone(&storage), Arc::clone(&clock), config.review),
            analytics: AnalyticsAggregator::new(Arc::clone(&storage), config.analytics),
            resources: ResourceProcessor::new(storage, Arc::clone(&clock), config.resources),
            profiles,
            clock,
            content,
        }
    }

    // ===== Profile =====

    pub fn setup_profile(&self, user_id: &str, setup: ProfileSetup) -> Result<Profile> {
        self.profiles.setup(user_id, setup)
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Profile> {
        self.profiles.get(user_id)
    }

    // ===== Planning =====

    pub fn generate_plan(&self, user_id: &str, request: &PlanRequest) -> Result<GeneratedPlan> {
        self.planner.generate(user_id, request)
    }

    pub fn extend_plan(&self, user_id: &str, plan_id: Uuid, end_date: NaiveDate) -> Result<StudyPlan> {
        self.planner.extend_plan(user_id, plan_id, end_date)
    }

    // ===== Progress =====

    pub fn log_progress(
        &self,
        user_id: &str,
        item_id: Uuid,
        minutes: i32,
        status: PlanItemStatus,
    ) -> Result<PlanItem> {
        self.progress.log_progress(user_id, item_id, minutes, status)
    }

    pub fn list_items(&self, user_id: &str, date: Option<NaiveDate>) -> Result<Vec<PlanItem>> {
        self.progress.list_items(user_id, date)
    }

    pub fn reschedule_item(&self, user_id: &str, item_id: Uuid, date: NaiveDate) -> Result<PlanItem> {
        self.progress.reschedule_item(user_id, item_id, date)
    }

    // ===== Reviews =====

    pub fn record_review(&self, user_id: &str, card_id: Uuid, quality: i32) -> Result<Flashcard> {
        self.reviews.record_review(user_id, card_id, quality)
    }

    /// Cards due now according to the engine clock
    pub fn get_due_cards(&self, user_id: &str, limit: Option<i32>) -> Result<Vec<Flashcard>> {
        self.reviews.get_due_cards(user_id, self.clock.now(), limit)
    }

    pub fn preview_review(&self, user_id: &str, card_id: Uuid) -> Result<[i32; 6]> {
        self.reviews.preview(user_id, card_id)
    }

    pub fn create_flashcards(
        &self,
        user_id: &str,
        subject: Subject,
        topic: &str,
        count: usize,
    ) -> Result<Vec<Flashcard>> {
        self.reviews
            .create_cards(user_id, self.content.as_ref(), subject, topic, count)
    }

    // ===== Analytics =====

    pub fn get_dashboard(&self, user_id: &str) -> Result<DashboardStats> {
        self.analytics.get_dashboard(user_id)
    }

    // ===== Resources =====

    pub fn resources(&self) -> &ResourceProcessor {
        &self.resources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::content::TemplateContentService;
    use crate::storage::{FileStorage, MemoryStorage};
    use chrono::Duration;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn engine_with(storage: Arc<dyn Storage>, clock: Arc<FixedClock>) -> StudyEngine {
        StudyEngine::new(
            storage,
            clock,
            Arc::new(TemplateContentService),
            EngineConfig::default(),
        )
    }

    fn setup(engine: &StudyEngine, user_id: &str) {
        engine
            .setup_profile(
                user_id,
                ProfileSetup {
                    name: "Nandini".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn test_plan_progress_dashboard_flow() {
        let clock = Arc::new(FixedClock::at_date(today()));
        let engine = engine_with(Arc::new(MemoryStorage::new()), clock);
        setup(&engine, "u1");

        let request = PlanRequest::new(
            today() + Duration::days(200),
            6,
            vec![Subject::Gs1, Subject::Gs2, Subject::Gs3],
        );
        let generated = engine.generate_plan("u1", &request).unwrap();
        assert_eq!(generated.items.len(), 14);

        let first = generated.items[0].id;
        engine.log_progress("u1", first, 120, PlanItemStatus::Done).unwrap();
        engine.log_progress("u1", first, 120, PlanItemStatus::Done).unwrap();
        assert_eq!(engine.get_profile("u1").unwrap().total_study_minutes, 120);

        let skipped = generated.items[1].id;
        engine.log_progress("u1", skipped, 0, PlanItemStatus::Skipped).unwrap();

        let stats = engine.get_dashboard("u1").unwrap();
        assert_eq!(stats.total_study_minutes, 120);
        assert!((stats.completion_rate - 100.0 / 14.0).abs() < 1e-9);
        assert_eq!(stats.subject_stats[&Subject::Gs1].minutes, 120);
        assert_eq!(stats.weekly_minutes, [17; 7]);

        let today_items = engine.list_items("u1", Some(today())).unwrap();
        assert_eq!(today_items.len(), 1);
        assert_eq!(today_items[0].status, PlanItemStatus::Done);
    }

    #[test]
    fn test_review_cycle_uses_engine_clock() {
        let clock = Arc::new(FixedClock::at_date(today()));
        let engine = engine_with(Arc::new(MemoryStorage::new()), clock.clone());

        let cards = engine
            .create_flashcards("u1", Subject::Gs2, "Constitution", 2)
            .unwrap();
        assert_eq!(engine.get_due_cards("u1", None).unwrap().len(), 2);

        let card = engine.record_review("u1", cards[0].id, 5).unwrap();
        assert_eq!((card.reps, card.interval_days), (1, 1));
        assert_eq!(engine.get_due_cards("u1", None).unwrap().len(), 1);

        clock.advance(Duration::days(1));
        let card = engine.record_review("u1", cards[0].id, 5).unwrap();
        assert_eq!((card.reps, card.interval_days), (2, 6));

        clock.advance(Duration::days(6));
        let card = engine.record_review("u1", cards[0].id, 5).unwrap();
        assert_eq!((card.reps, card.interval_days), (3, 17));

        let preview = engine.preview_review("u1", cards[0].id).unwrap();
        assert_eq!(preview[2], 1);
    }

    #[test]
    fn test_file_backed_engine_survives_restart() {
        let temp = TempDir::new().unwrap();
        let clock = Arc::new(FixedClock::at_date(today()));

        let item_id = {
            let storage = FileStorage::new(temp.path().to_path_buf());
            storage.init().unwrap();
            let engine = engine_with(Arc::new(storage), clock.clone());
            setup(&engine, "u1");
            let generated = engine
                .generate_plan(
                    "u1",
                    &PlanRequest::new(today() + Duration::days(3), 2, vec![Subject::Essay]),
                )
                .unwrap();
            assert_eq!(generated.items.len(), 3);
            engine
                .log_progress("u1", generated.items[0].id, 90, PlanItemStatus::Done)
                .unwrap();
            generated.items[0].id
        };

        let engine = engine_with(Arc::new(FileStorage::new(temp.path().to_path_buf())), clock);
        assert_eq!(engine.get_profile("u1").unwrap().total_study_minutes, 90);
        engine.log_progress("u1", item_id, 90, PlanItemStatus::Done).unwrap();
        assert_eq!(engine.get_profile("u1").unwrap().total_study_minutes, 90);
        assert_eq!(engine.list_items("u1", None).unwrap().len(), 3);
    }
}
