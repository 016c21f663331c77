// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory status controller.

use std::collections::HashMap;

use cw_core::{BuildState, StatusController};
use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct ProjectStatus {
    build_state: Option<BuildState>,
    key: Option<String>,
    message: Option<String>,
}

/// Default `StatusController`: a locked table of per-project build states.
#[derive(Default)]
pub struct InMemoryStatus {
    table: Mutex<HashMap<String, ProjectStatus>>,
}

impl InMemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last status message recorded for a project (rank texts in tests).
    pub fn message(&self, project_id: &str) -> Option<String> {
        self.table.lock().get(project_id).and_then(|s| s.message.clone())
    }

    /// Last status key recorded for a project.
    pub fn key(&self, project_id: &str) -> Option<String> {
        self.table.lock().get(project_id).and_then(|s| s.key.clone())
    }

    /// Whether the project is registered at all.
    pub fn registered(&self, project_id: &str) -> bool {
        self.table.lock().contains_key(project_id)
    }
}

impl StatusController for InMemoryStatus {
    fn add_project(&self, project_id: &str) {
        debug!(%project_id, "registering project status");
        self.table.lock().entry(project_id.to_string()).or_default();
    }

    fn delete_project(&self, project_id: &str) {
        debug!(%project_id, "dropping project status");
        self.table.lock().remove(project_id);
    }

    fn update_build_state(
        &self,
        project_id: &str,
        state: BuildState,
        key: &str,
        message: Option<String>,
    ) {
        debug!(%project_id, %state, key, "build state transition");
        let mut table = self.table.lock();
        let entry = table.entry(project_id.to_string()).or_default();
        entry.build_state = Some(state);
        entry.key = Some(key.to_string());
        entry.message = message;
    }

    fn build_state(&self, project_id: &str) -> Option<BuildState> {
        self.table.lock().get(project_id).and_then(|s| s.build_state)
    }
}
