// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle coordinator: the top-level create/delete/action entry points.

mod actions;
mod queries;

pub use actions::{ActionRequest, ActionResult};
pub use queries::{LogBundle, LogFileCheck, LogsResult};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cw_core::{
    DeletionStatus, EventBus, HandlerRegistry, LifecycleError, Operation, OperationKind,
    PortalEvent, ProjectHandler, ProjectInfo, StartMode, StatusController, Translator,
};
use parking_lot::Mutex;
use sha1::{Digest, Sha1};
use tracing::{info, warn};

use crate::config::Config;
use crate::logs::{self, LogListCache};
use crate::scheduler::{BuildQueueEntry, BuildScheduler};
use crate::settings;
use crate::store::ProjectInfoStore;
use crate::watcher::WatcherSupervisor;

/// A create request from the front-end dispatcher.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub project_id: String,
    pub project_type: String,
    pub location: PathBuf,
    pub start_mode: Option<String>,
    pub extension_id: Option<String>,
}

/// Accepted create: the build runs asynchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResult {
    pub status_code: u16,
    pub operation_id: String,
    pub build_log_path: PathBuf,
}

/// Accepted asynchronous operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedResult {
    pub status_code: u16,
    pub operation_id: String,
}

/// Shutdown outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownResult {
    pub status_code: u16,
}

/// Image identifier handed to handlers: `<id>-<type>-<sha1(location)>`.
pub fn image_id(project_id: &str, project_type: &str, location: &Path) -> String {
    let mut hasher = Sha1::new();
    hasher.update(location.to_string_lossy().as_bytes());
    format!("{project_id}-{project_type}-{:x}", hasher.finalize())
}

/// Drives the project info store, watcher supervisor, and build scheduler
/// behind the public lifecycle operations.
pub struct Coordinator {
    config: Arc<Config>,
    store: Arc<ProjectInfoStore>,
    scheduler: Arc<BuildScheduler>,
    watcher: Arc<WatcherSupervisor>,
    registry: Arc<dyn HandlerRegistry>,
    status: Arc<dyn StatusController>,
    bus: Arc<dyn EventBus>,
    /// Registered projects, dropped on delete and shutdown.
    projects: Mutex<HashMap<String, ProjectInfo>>,
    log_lists: LogListCache,
}

impl Coordinator {
    pub fn new(
        config: Config,
        registry: Arc<dyn HandlerRegistry>,
        status: Arc<dyn StatusController>,
        bus: Arc<dyn EventBus>,
        translator: Arc<dyn Translator>,
    ) -> Arc<Self> {
        let config = Arc::new(config);
        let store = Arc::new(ProjectInfoStore::new(config.projects_data_dir.clone()));
        let watcher = Arc::new(WatcherSupervisor::new(Arc::clone(&config)));
        let scheduler = Arc::new(BuildScheduler::new(
            Arc::clone(&config),
            Arc::clone(&status),
            Arc::clone(&bus),
            translator,
            Arc::clone(&watcher),
        ));
        Arc::new(Self {
            config,
            store,
            scheduler,
            watcher,
            registry,
            status,
            bus,
            projects: Mutex::new(HashMap::new()),
            log_lists: LogListCache::new(),
        })
    }

    /// The scheduler, for spawning its supervisor loop.
    pub fn scheduler(&self) -> Arc<BuildScheduler> {
        Arc::clone(&self.scheduler)
    }

    /// The info store (read-only access for front-end queries).
    pub fn store(&self) -> Arc<ProjectInfoStore> {
        Arc::clone(&self.store)
    }

    /// Register, persist, and enqueue a project build.
    pub async fn create(&self, req: CreateRequest) -> Result<CreateResult, LifecycleError> {
        if req.project_id.is_empty()
            || req.project_type.is_empty()
            || req.location.as_os_str().is_empty()
        {
            return Err(LifecycleError::BadRequest(
                "projectID, projectType, and location are required".to_string(),
            ));
        }

        let project_settings = settings::read_settings(&req.location);

        logs::create_log_dir(&req.location, &req.project_id).await?;

        if let Some(prior) = self.store.load_by_id(&req.project_id, true) {
            if prior.project_type != req.project_type || prior.location != req.location {
                return Err(LifecycleError::Conflict(format!(
                    "project {} is registered as {} at {}",
                    req.project_id,
                    prior.project_type,
                    prior.location.display()
                )));
            }
            // Re-creation of the same project: reap its child processes and
            // fall through to a fresh build.
            info!(project_id = %req.project_id, "re-creating existing project");
            self.watcher.stop(&req.project_id, &prior.location).await;
        }

        if !req.location.exists() {
            return Err(LifecycleError::NotFound(format!(
                "project location {} does not exist",
                req.location.display()
            )));
        }

        let handler = self.handler_for_type(&req.project_type)?;

        let mut info = ProjectInfo::new(&req.project_id, &req.project_type, &req.location);
        info.extension_id = req.extension_id.clone();
        settings::merge_settings(&mut info, handler.as_ref(), project_settings.as_ref());

        if let Some(raw) = req.start_mode.as_deref() {
            let mode = StartMode::parse(raw).ok_or_else(|| {
                LifecycleError::BadRequest(format!("unknown start mode {raw}"))
            })?;
            if !handler.capabilities().supports(mode) {
                return Err(LifecycleError::BadRequest(format!(
                    "start mode {mode} is not supported for {} projects",
                    req.project_type
                )));
            }
            info.start_mode = mode;
        }

        self.store.ensure_project_dir(&req.project_id)?;
        self.store.save(&info, true);
        self.status.add_project(&req.project_id);
        self.remember(info.clone());

        let operation = Operation::new(OperationKind::Create, info.clone());
        let operation_id = operation.operation_id.clone();
        // Enqueue is idempotent by project id and broadcasts ranks + a tick.
        self.scheduler.enqueue(BuildQueueEntry::new(operation, handler));

        Ok(CreateResult {
            status_code: 202,
            operation_id,
            build_log_path: logs::build_log_path(&req.location, &req.project_id),
        })
    }

    /// Remove a project from the scheduler and tear it down asynchronously.
    pub async fn delete(
        self: &Arc<Self>,
        project_id: &str,
    ) -> Result<AcceptedResult, LifecycleError> {
        if project_id.is_empty() {
            return Err(LifecycleError::BadRequest("projectID is required".to_string()));
        }
        let info_file = self.store.info_file(project_id);
        if !info_file.exists() && !self.store.cached(&info_file) {
            return Err(LifecycleError::NotFound(format!("project {project_id} is not registered")));
        }
        let info = self
            .store
            .load(&info_file, false)
            .ok_or_else(|| LifecycleError::NotFound(format!("project {project_id} is not registered")))?;

        let operation = Operation::new(OperationKind::Delete, info);
        let operation_id = operation.operation_id.clone();

        self.scheduler.remove_from_queue(project_id);
        self.scheduler.remove_running(project_id);

        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.run_deletion(operation).await });

        Ok(AcceptedResult { status_code: 202, operation_id })
    }

    /// Asynchronous half of delete; the outcome goes out on the event bus.
    async fn run_deletion(&self, operation: Operation) {
        let info = &operation.project_info;
        let project_id = &info.project_id;
        info!(%project_id, operation_id = %operation.operation_id, "deleting project");

        self.status.delete_project(project_id);
        self.projects.lock().remove(project_id);
        // In cluster mode this only drops the in-memory entry; the
        // supervisor no-ops process handling.
        self.watcher.stop(project_id, &info.location).await;

        let mut error = match self.registry.handler_for(&info.project_type) {
            Some(handler) => {
                handler.delete_container(info).await.err().map(|e| e.to_string())
            }
            None => Some(format!("no handler for project type {}", info.project_type)),
        };

        let project_dir = self.store.project_dir(project_id);
        if project_dir == Path::new("/") {
            warn!(%project_id, "refusing to remove / as a metadata directory");
        } else if let Err(e) = tokio::fs::remove_dir_all(&project_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(%project_id, error = %e, "failed to remove metadata directory");
                error.get_or_insert_with(|| e.to_string());
            }
        }

        self.store.evict(&self.store.info_file(project_id));
        logs::remove_log_dir(&info.location, project_id).await;
        self.log_lists.clear(project_id);

        let status =
            if error.is_none() { DeletionStatus::Success } else { DeletionStatus::Failed };
        self.bus.emit(PortalEvent::ProjectDeletion {
            operation_id: operation.operation_id.clone(),
            project_id: project_id.clone(),
            status,
            error,
        });
    }

    /// Truncate the scheduler and stop every known project.
    pub async fn shutdown(&self) -> ShutdownResult {
        info!("shutting down all projects");
        self.scheduler.shutdown();
        let projects: Vec<ProjectInfo> =
            self.projects.lock().drain().map(|(_, info)| info).collect();
        for info in &projects {
            self.status.delete_project(&info.project_id);
        }
        self.watcher.stop_all().await;
        ShutdownResult { status_code: 202 }
    }

    fn remember(&self, info: ProjectInfo) {
        self.projects.lock().insert(info.project_id.clone(), info);
    }

    fn handler_for_type(
        &self,
        project_type: &str,
    ) -> Result<Arc<dyn ProjectHandler>, LifecycleError> {
        let handler = self
            .registry
            .handler_for(project_type)
            .ok_or_else(|| LifecycleError::NotFound(format!("no handler for type {project_type}")))?;
        if handler.supported_type() != project_type {
            return Err(LifecycleError::NotFound(format!(
                "handler mismatch for type {project_type}"
            )));
        }
        Ok(handler)
    }

    fn loaded_info(&self, project_id: &str) -> Result<ProjectInfo, LifecycleError> {
        if project_id.is_empty() {
            return Err(LifecycleError::BadRequest("projectID is required".to_string()));
        }
        self.store
            .load_by_id(project_id, true)
            .ok_or_else(|| LifecycleError::NotFound(format!("project {project_id} is not registered")))
    }
}

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
