//! Background processing of uploaded resources
//!
//! A submitted resource is stored as `uploaded` and handed to a Tokio task
//! that moves it through `parsed` and `indexed`. Nothing in the engine waits
//! on this; callers that care observe the [`ProcessingHandle`].

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::models::{Resource, ResourceRequest, ResourceStatus};
use crate::clock::Clock;
use crate::config::ResourceConfig;
use crate::error::{EngineError, Result};
use crate::storage::Storage;

/// Observable progress of one resource's processing task
pub struct ProcessingHandle {
    pub resource_id: Uuid,
    status: watch::Receiver<ResourceStatus>,
    task: JoinHandle<()>,
}

impl ProcessingHandle {
    /// Latest status published by the task
    pub fn current(&self) -> ResourceStatus {
        *self.status.borrow()
    }

    /// Wait until the resource reaches at least `target`. Returns the status
    /// reached, which is short of `target` if the task stopped early.
    pub async fn wait_for(&mut self, target: ResourceStatus) -> ResourceStatus {
        let reached = match self.status.wait_for(|status| *status >= target).await {
            Ok(status) => Some(*status),
            // Task ended without reaching the target
            Err(_) => None,
        };
        reached.unwrap_or_else(|| *self.status.borrow())
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

pub struct ResourceProcessor {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    config: ResourceConfig,
}

impl ResourceProcessor {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, config: ResourceConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    /// Store a resource and start processing it in the background.
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, user_id: &str, request: ResourceRequest) -> Result<(Resource, ProcessingHandle)> {
        if request.title.trim().is_empty() {
            return Err(EngineError::invalid("resource title must not be empty"));
        }

        let resource = Resource {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind: request.kind,
            title: request.title,
            content: request.content,
            url: request.url,
            status: ResourceStatus::Uploaded,
            created_at: self.clock.now(),
        };
        self.storage.insert_resource(&resource)?;

        let (tx, rx) = watch::channel(ResourceStatus::Uploaded);
        let task = tokio::spawn(run_pipeline(
            Arc::clone(&self.storage),
            resource.id,
            self.config.clone(),
            tx,
        ));

        log::info!("Queued resource {} ({}) for processing", resource.id, resource.title);
        Ok((
            resource.clone(),
            ProcessingHandle {
                resource_id: resource.id,
                status: rx,
                task,
            },
        ))
    }

    pub fn list(&self, user_id: &str) -> Result<Vec<Resource>> {
        Ok(self.storage.list_resources(user_id)?)
    }
}

async fn run_pipeline(
    storage: Arc<dyn Storage>,
    resource_id: Uuid,
    config: ResourceConfig,
    tx: watch::Sender<ResourceStatus>,
) {
    let stages = [
        (config.parse_delay(), ResourceStatus::Parsed),
        (config.index_delay(), ResourceStatus::Indexed),
    ];

    for (delay, status) in stages {
        tokio::time::sleep(delay).await;

        // Storage is synchronous file I/O
        let storage = Arc::clone(&storage);
        let written =
            tokio::task::spawn_blocking(move || advance(storage.as_ref(), resource_id, status)).await;
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::warn!("Stopped processing resource {}: {}", resource_id, e);
                return;
            }
            Err(e) => {
                log::warn!("Status write for resource {} did not complete: {}", resource_id, e);
                return;
            }
        }
        // Nobody watching is fine
        let _ = tx.send(status);
    }
}

fn advance(storage: &dyn Storage, resource_id: Uuid, status: ResourceStatus) -> Result<()> {
    let mut resource = storage
        .get_resource(resource_id)?
        .ok_or_else(|| EngineError::not_found(format!("resource {}", resource_id)))?;
    resource.status = status;
    storage.update_resource(&resource)?;
    Ok(())
}
