// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project log directories and the known-log-file cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cw_core::{LifecycleError, LogKind};
use parking_lot::Mutex;
use tracing::warn;

/// Docker build log file name inside a project's log directory.
pub const DOCKER_BUILD_LOG: &str = "dockerBuild.log";

/// `<project_name>-<project_id>`
pub fn log_dir_name(project_id: &str, project_name: &str) -> String {
    format!("{project_name}-{project_id}")
}

/// Workspace log root: `.logs` next to the project location.
pub fn logs_root(location: &Path) -> PathBuf {
    location.parent().unwrap_or(location).join(".logs")
}

/// The project's log directory under the workspace log root.
pub fn project_log_dir(location: &Path, project_id: &str) -> PathBuf {
    let name = location
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| project_id.to_string());
    logs_root(location).join(log_dir_name(project_id, &name))
}

/// The deterministic docker-build log path returned from create.
pub fn build_log_path(location: &Path, project_id: &str) -> PathBuf {
    project_log_dir(location, project_id).join(DOCKER_BUILD_LOG)
}

pub async fn create_log_dir(location: &Path, project_id: &str) -> Result<(), LifecycleError> {
    tokio::fs::create_dir_all(project_log_dir(location, project_id)).await?;
    Ok(())
}

/// Remove the project's log directory; absence is not an error.
pub async fn remove_log_dir(location: &Path, project_id: &str) {
    let dir = project_log_dir(location, project_id);
    if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %dir.display(), error = %e, "failed to remove log directory");
        }
    }
}

/// Last log-file list reported per project and kind.
#[derive(Default)]
pub struct LogListCache {
    entries: Mutex<HashMap<String, HashMap<LogKind, Vec<PathBuf>>>>,
}

impl LogListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, project_id: &str, kind: LogKind) -> Option<Vec<PathBuf>> {
        self.entries.lock().get(project_id).and_then(|kinds| kinds.get(&kind)).cloned()
    }

    pub fn set(&self, project_id: &str, kind: LogKind, files: Vec<PathBuf>) {
        self.entries.lock().entry(project_id.to_string()).or_default().insert(kind, files);
    }

    /// Drop everything cached for a project (used on delete).
    pub fn clear(&self, project_id: &str) {
        self.entries.lock().remove(project_id);
    }
}

/// Order-insensitive list equality (mutual subset).
pub fn same_file_set(a: &[PathBuf], b: &[PathBuf]) -> bool {
    a.iter().all(|f| b.contains(f)) && b.iter().all(|f| a.contains(f))
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
