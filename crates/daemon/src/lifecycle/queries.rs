// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log queries: the handler-reported bundles and the new-log-file poll.

use std::path::PathBuf;

use cw_core::{EventBus, LifecycleError, LogKind, PortalEvent, ProjectHandler};

use super::Coordinator;
use crate::logs;

/// Handler-reported app and build log files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBundle {
    pub app: Vec<PathBuf>,
    pub build: Vec<PathBuf>,
}

/// `logs` outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsResult {
    pub status_code: u16,
    pub logs: LogBundle,
}

/// `check_new_log_file` outcome: `logs` is set only when the list changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileCheck {
    pub status_code: u16,
    pub logs: Option<Vec<PathBuf>>,
}

impl Coordinator {
    /// The current app/build log bundle for a project.
    pub async fn logs(&self, project_id: &str) -> Result<LogsResult, LifecycleError> {
        let info = self.loaded_info(project_id)?;
        if !info.location.exists() {
            return Err(LifecycleError::NotFound(format!(
                "project location {} does not exist",
                info.location.display()
            )));
        }
        let handler = self.handler_for_type(&info.project_type)?;
        let app = handler.log_files(&info, LogKind::App).await;
        let build = handler.log_files(&info, LogKind::Build).await;
        Ok(LogsResult { status_code: 200, logs: LogBundle { app, build } })
    }

    /// Poll the handler for log files of one kind, with a bounded retry while
    /// none exist yet. Emits `projectLogsListChanged` when the cached list
    /// differs from the handler's report (order-insensitive comparison).
    pub async fn check_new_log_file(
        &self,
        project_id: &str,
        kind: LogKind,
    ) -> Result<LogFileCheck, LifecycleError> {
        let info = self.loaded_info(project_id)?;
        let handler = self.handler_for_type(&info.project_type)?;

        let mut files = handler.log_files(&info, kind).await;
        let mut attempts: u32 = 0;
        while files.is_empty() && attempts < self.config.log_retries {
            tokio::time::sleep(self.config.log_retry_delay).await;
            files = handler.log_files(&info, kind).await;
            attempts += 1;
        }

        match self.log_lists.get(project_id, kind) {
            // Nothing known, nothing reported: keep waiting on a later poll.
            None if files.is_empty() => Ok(LogFileCheck { status_code: 200, logs: None }),
            None => {
                self.log_lists.set(project_id, kind, files.clone());
                self.bus.emit(PortalEvent::ProjectLogsListChanged {
                    project_id: project_id.to_string(),
                    kind,
                });
                Ok(LogFileCheck { status_code: 200, logs: Some(files) })
            }
            Some(cached) if logs::same_file_set(&cached, &files) => {
                Ok(LogFileCheck { status_code: 200, logs: None })
            }
            Some(_) => {
                self.log_lists.set(project_id, kind, files.clone());
                self.bus.emit(PortalEvent::ProjectLogsListChanged {
                    project_id: project_id.to_string(),
                    kind,
                });
                Ok(LogFileCheck { status_code: 200, logs: Some(files) })
            }
        }
    }
}

#[cfg(test)]
#[path = "queries_tests.rs"]
mod tests;
