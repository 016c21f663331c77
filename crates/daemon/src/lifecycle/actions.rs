// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project actions and live reconfiguration.

use cw_core::{
    BuildState, LifecycleError, Operation, OperationKind, ProjectSettings, StatusController,
};
use tracing::info;

use super::{AcceptedResult, Coordinator};
use crate::scheduler::BuildQueueEntry;
use crate::settings;
use crate::store::InfoUpdate;

/// An action request from the front-end dispatcher.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub action: String,
    pub project_id: String,
    /// New watch list for `reconfigWatchedFiles`.
    pub watched_files: Option<Vec<String>>,
}

/// Action outcome: 200 for synchronous actions, 202 for asynchronous ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub status_code: u16,
    pub operation_id: String,
}

impl Coordinator {
    /// Dispatch a named action. Unknown names are a bad request.
    pub async fn action(&self, req: ActionRequest) -> Result<ActionResult, LifecycleError> {
        match req.action.as_str() {
            "build" => self.action_build(&req.project_id).await,
            "validate" => self.action_validate(&req.project_id).await,
            "enableautobuild" => self.action_auto_build(&req.project_id, true).await,
            "disableautobuild" => self.action_auto_build(&req.project_id, false).await,
            "reconfigWatchedFiles" => self.action_reconfig_watched(&req).await,
            other => Err(LifecycleError::BadRequest(format!("unknown action {other}"))),
        }
    }

    async fn action_build(&self, project_id: &str) -> Result<ActionResult, LifecycleError> {
        let info = self.loaded_info(project_id)?;
        let handler = self.handler_for_type(&info.project_type)?;
        let operation = Operation::new(OperationKind::Build, info);
        let operation_id = operation.operation_id.clone();
        self.scheduler.enqueue(BuildQueueEntry::new(operation, handler));
        Ok(ActionResult { status_code: 202, operation_id })
    }

    async fn action_validate(&self, project_id: &str) -> Result<ActionResult, LifecycleError> {
        let info = self.loaded_info(project_id)?;
        let handler = self.handler_for_type(&info.project_type)?;
        let operation = Operation::new(OperationKind::Validate, info.clone());

        let missing = handler
            .required_files()
            .iter()
            .find(|required| !info.location.join(required.trim_start_matches('/')).exists());
        if let Some(missing) = missing {
            self.status.update_build_state(
                project_id,
                BuildState::Failed,
                "buildscripts.buildFailMissingFile",
                Some(format!("required file {missing} is missing")),
            );
        }
        Ok(ActionResult { status_code: 202, operation_id: operation.operation_id })
    }

    async fn action_auto_build(
        &self,
        project_id: &str,
        enabled: bool,
    ) -> Result<ActionResult, LifecycleError> {
        self.loaded_info(project_id)?;
        let info = self
            .store
            .update(project_id, InfoUpdate::AutoBuild(enabled))
            .ok_or_else(|| LifecycleError::NotFound(format!("project {project_id} is not registered")))?;
        self.remember(info.clone());
        info!(%project_id, enabled, "auto build reconfigured");

        if enabled {
            // Re-enabling auto build catches up on missed changes.
            let kind = OperationKind::EnableAutoBuild;
            let handler = self.handler_for_type(&info.project_type)?;
            let operation = Operation::new(kind, info);
            let operation_id = operation.operation_id.clone();
            self.scheduler.enqueue(BuildQueueEntry::new(operation, handler));
            Ok(ActionResult { status_code: 202, operation_id })
        } else {
            let operation = Operation::new(OperationKind::DisableAutoBuild, info);
            Ok(ActionResult { status_code: 200, operation_id: operation.operation_id })
        }
    }

    async fn action_reconfig_watched(
        &self,
        req: &ActionRequest,
    ) -> Result<ActionResult, LifecycleError> {
        self.loaded_info(&req.project_id)?;
        let watched = req.watched_files.clone().ok_or_else(|| {
            LifecycleError::BadRequest("watched files are required for reconfigWatchedFiles".to_string())
        })?;
        let info = self
            .store
            .update(&req.project_id, InfoUpdate::WatchedFiles(Some(watched)))
            .ok_or_else(|| {
                LifecycleError::NotFound(format!("project {} is not registered", req.project_id))
            })?;
        self.remember(info.clone());

        self.watcher.stop(&info.project_id, &info.location).await;
        self.watcher.start(&info).await;

        let operation = Operation::new(OperationKind::ReconfigWatchedFiles, info);
        Ok(ActionResult { status_code: 200, operation_id: operation.operation_id })
    }

    /// Reconfigure a live project from a settings document.
    pub async fn specification(
        &self,
        project_id: &str,
        settings_doc: ProjectSettings,
    ) -> Result<AcceptedResult, LifecycleError> {
        let mut info = self.loaded_info(project_id)?;
        let handler = self.handler_for_type(&info.project_type)?;

        let watch_lists_before = (info.watched_files.clone(), info.ignored_files.clone());
        settings::merge_settings(&mut info, handler.as_ref(), Some(&settings_doc));
        self.store.save(&info, true);
        self.remember(info.clone());

        if (info.watched_files.clone(), info.ignored_files.clone()) != watch_lists_before {
            self.watcher.stop(&info.project_id, &info.location).await;
            self.watcher.start(&info).await;
        }

        let operation = Operation::new(OperationKind::Update, info);
        Ok(AcceptedResult { status_code: 202, operation_id: operation.operation_id })
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
