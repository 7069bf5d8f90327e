//! Profile reads and the compare-and-swap update loop

use std::sync::Arc;

use crate::clock::Clock;
use crate::config::ProfileConfig;
use crate::error::{EngineError, Result};
use crate::storage::Storage;

use super::models::{Profile, ProfileSetup};

pub struct ProfileManager {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    config: ProfileConfig,
}

impl ProfileManager {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, config: ProfileConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    pub fn get(&self, user_id: &str) -> Result<Profile> {
        self.storage
            .get_profile(user_id)?
            .ok_or_else(|| EngineError::not_found(format!("profile for user {}", user_id)))
    }

    /// Create the profile, or update its descriptive fields. Aggregates are
    /// carried over untouched.
    pub fn setup(&self, user_id: &str, setup: ProfileSetup) -> Result<Profile> {
        if setup.name.trim().is_empty() {
            return Err(EngineError::invalid("profile name must not be empty"));
        }
        if let Some(hours) = setup.hours_per_day {
            if hours <= 0 {
                return Err(EngineError::invalid("hours per day must be positive"));
            }
        }

        if self.storage.get_profile(user_id)?.is_none() {
            let mut profile = Profile::new(user_id.to_string(), setup.name, self.clock.now());
            profile.exam_date = setup.exam_date;
            profile.optional_subject = setup.optional_subject;
            if setup.hours_per_day.is_some() {
                profile.hours_per_day = setup.hours_per_day;
            }
            self.storage.put_profile(&profile)?;
            log::info!("Created profile for {}", user_id);
            return Ok(profile);
        }

        self.update(user_id, |profile| {
            profile.name = setup.name.clone();
            profile.exam_date = setup.exam_date;
            profile.optional_subject = setup.optional_subject.clone();
            if setup.hours_per_day.is_some() {
                profile.hours_per_day = setup.hours_per_day;
            }
        })
    }

    /// Add `delta` minutes to the profile total (negative deltas subtract,
    /// saturating at zero).
    pub fn apply_minutes_delta(&self, user_id: &str, delta: i64) -> Result<Profile> {
        self.update(user_id, |profile| {
            profile.total_study_minutes = profile.total_study_minutes.saturating_add_signed(delta);
        })
    }

    /// Read-modify-write with optimistic concurrency. `mutate` may run more
    /// than once and must be a pure function of the profile it is given.
    fn update<F>(&self, user_id: &str, mutate: F) -> Result<Profile>
    where
        F: Fn(&mut Profile),
    {
        let attempts = self.config.max_update_attempts.max(1);
        for attempt in 1..=attempts {
            let current = self.get(user_id)?;
            let mut next = current.clone();
            mutate(&mut next);
            next.version = current.version + 1;
            next.updated_at = self.clock.now();

            if self.storage.swap_profile(&next, current.version)? {
                return Ok(next);
            }
            log::debug!(
                "Profile {} changed underneath update (attempt {}/{})",
                user_id,
                attempt,
                attempts
            );
        }

        Err(EngineError::Conflict {
            user_id: user_id.to_string(),
            attempts,
        })
    }
}
