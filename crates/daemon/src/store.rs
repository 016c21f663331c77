// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project info store: write-through cache over one JSON document per project.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cw_core::{LifecycleError, ProjectInfo, StartMode};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// A typed change to one field of a persisted `ProjectInfo`.
///
/// The app-port variant replaces the single slot, so the ≤ 1 ports
/// invariant holds at every write site.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoUpdate {
    AppPort(String),
    AutoBuild(bool),
    WatchedFiles(Option<Vec<String>>),
    StartMode(StartMode),
}

/// Owns the on-disk project JSON documents and their in-memory cache.
///
/// The cache is authoritative: disk writes are asynchronous and best-effort,
/// disk read failures are treated as "not found".
pub struct ProjectInfoStore {
    projects_data_dir: PathBuf,
    cache: Mutex<HashMap<PathBuf, ProjectInfo>>,
}

impl ProjectInfoStore {
    pub fn new(projects_data_dir: PathBuf) -> Self {
        Self { projects_data_dir, cache: Mutex::new(HashMap::new()) }
    }

    /// Path of the info file for a project id.
    pub fn info_file(&self, project_id: &str) -> PathBuf {
        self.projects_data_dir.join(project_id).join(format!("{project_id}.json"))
    }

    /// Metadata directory for a project id.
    pub fn project_dir(&self, project_id: &str) -> PathBuf {
        self.projects_data_dir.join(project_id)
    }

    /// Create the metadata directory. Already-exists is not an error.
    pub fn ensure_project_dir(&self, project_id: &str) -> Result<(), LifecycleError> {
        std::fs::create_dir_all(self.project_dir(project_id))?;
        Ok(())
    }

    /// Update the cache and, when `persist` is set, write the JSON document
    /// in the background. Write errors are logged, never raised: the cache
    /// remains authoritative.
    pub fn save(&self, info: &ProjectInfo, persist: bool) {
        let info_file = self.info_file(&info.project_id);
        self.cache.lock().insert(info_file.clone(), info.clone());
        if !persist {
            return;
        }
        let json = match serde_json::to_string_pretty(info) {
            Ok(json) => json,
            Err(e) => {
                warn!(project_id = %info.project_id, error = %e, "failed to serialize project info");
                return;
            }
        };
        let project_id = info.project_id.clone();
        tokio::spawn(async move {
            if let Some(parent) = info_file.parent() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    warn!(%project_id, error = %e, "failed to create project metadata dir");
                    return;
                }
            }
            if let Err(e) = tokio::fs::write(&info_file, json).await {
                warn!(%project_id, error = %e, "failed to persist project info");
            }
        });
    }

    /// Load from cache, falling back to disk. Read or parse failures return
    /// `None` and are logged unless `quiet`.
    pub fn load(&self, info_file: &Path, quiet: bool) -> Option<ProjectInfo> {
        if let Some(info) = self.cache.lock().get(info_file) {
            return Some(info.clone());
        }
        let contents = match std::fs::read_to_string(info_file) {
            Ok(contents) => contents,
            Err(e) => {
                if !quiet {
                    warn!(path = %info_file.display(), error = %e, "failed to read project info");
                }
                return None;
            }
        };
        match serde_json::from_str::<ProjectInfo>(&contents) {
            Ok(info) => {
                self.cache.lock().insert(info_file.to_path_buf(), info.clone());
                Some(info)
            }
            Err(e) => {
                if !quiet {
                    warn!(path = %info_file.display(), error = %e, "failed to parse project info");
                }
                None
            }
        }
    }

    /// Load by project id.
    pub fn load_by_id(&self, project_id: &str, quiet: bool) -> Option<ProjectInfo> {
        self.load(&self.info_file(project_id), quiet)
    }

    /// Read-modify-write one field. Returns the updated record, or `None`
    /// when the project is unknown.
    pub fn update(&self, project_id: &str, update: InfoUpdate) -> Option<ProjectInfo> {
        let mut info = self.load_by_id(project_id, false)?;
        debug!(%project_id, ?update, "updating project info");
        match update {
            InfoUpdate::AppPort(port) => info.set_app_port(port),
            InfoUpdate::AutoBuild(enabled) => info.auto_build_enabled = enabled,
            InfoUpdate::WatchedFiles(files) => info.watched_files = files,
            InfoUpdate::StartMode(mode) => info.start_mode = mode,
        }
        self.save(&info, true);
        Some(info)
    }

    /// Drop the cache entry for an info file (used on delete).
    pub fn evict(&self, info_file: &Path) {
        self.cache.lock().remove(info_file);
    }

    /// Whether the cache currently holds an entry for the info file.
    pub fn cached(&self, info_file: &Path) -> bool {
        self.cache.lock().contains_key(info_file)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
