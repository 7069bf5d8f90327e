//! Engine configuration
//!
//! Loaded from a TOML file (by default `<data dir>/config.toml`). Every field
//! has a default, so a missing file or a partial file is valid:
//!
//! ```toml
//! [planner]
//! max_horizon_days = 14
//!
//! [review]
//! default_due_limit = 20
//!
//! [analytics]
//! recency_window = 30
//!
//! [profile]
//! max_update_attempts = 10
//!
//! [progress]
//! max_update_attempts = 10
//!
//! [resources]
//! parse_delay_ms = 2000
//! index_delay_ms = 3000
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub planner: PlannerConfig,
    pub review: ReviewConfig,
    pub analytics: AnalyticsConfig,
    pub profile: ProfileConfig,
    pub progress: ProgressConfig,
    pub resources: ResourceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Upper bound on the number of days a single plan schedules
    pub max_horizon_days: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_horizon_days: 14,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Cap applied when a due-card request gives no usable limit
    pub default_due_limit: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            default_due_limit: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Number of most recent completed items behind minute totals
    pub recency_window: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { recency_window: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Compare-and-swap attempts before an aggregate update reports a conflict
    pub max_update_attempts: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            max_update_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Compare-and-swap attempts on a plan item before reporting a conflict
    pub max_update_attempts: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            max_update_attempts: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub parse_delay_ms: u64,
    pub index_delay_ms: u64,
}

impl ResourceConfig {
    pub fn parse_delay(&self) -> Duration {
        Duration::from_millis(self.parse_delay_ms)
    }

    pub fn index_delay(&self) -> Duration {
        Duration::from_millis(self.index_delay_ms)
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            parse_delay_ms: 2000,
            index_delay_ms: 3000,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
