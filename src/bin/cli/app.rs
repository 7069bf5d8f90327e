use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use prep_lib::clock::{Clock, SystemClock};
use prep_lib::config::EngineConfig;
use prep_lib::content::TemplateContentService;
use prep_lib::storage::FileStorage;
use prep_lib::StudyEngine;

/// Shared application state for CLI commands
pub struct App {
    pub user: String,
    pub data_dir: PathBuf,
    pub engine: StudyEngine,
    clock: Arc<SystemClock>,
}

impl App {
    /// Open storage under `data_dir` (or the default data directory) and
    /// load the engine config
    pub fn new(user: String, data_dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => FileStorage::default_data_dir().context("Failed to get data directory")?,
        };

        let storage = FileStorage::new(data_dir.clone());
        storage
            .init()
            .with_context(|| format!("Failed to initialize storage in {}", data_dir.display()))?;

        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.join("config.toml"));
        let config = EngineConfig::load_or_default(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let clock = Arc::new(SystemClock);
        let engine = StudyEngine::new(
            Arc::new(storage),
            clock.clone(),
            Arc::new(TemplateContentService),
            config,
        );

        Ok(Self {
            user,
            data_dir,
            engine,
            clock,
        })
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
