// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-state vocabulary and the status-controller seam.

use serde::{Deserialize, Serialize};

/// Build state of a registered project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildState {
    Queued,
    InProgress,
    Success,
    Failed,
}

impl BuildState {
    /// Terminal states are reaped from the running set on the next tick.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildState::Success | BuildState::Failed)
    }
}

crate::simple_display! {
    BuildState {
        Queued => "queued",
        InProgress => "inProgress",
        Success => "success",
        Failed => "failed",
    }
}

/// Tracks per-project build state and emits transitions to the portal.
///
/// The controller keeps its own synchronisation; callers may hold the
/// scheduler lock while updating (lock order: cache → scheduler → status).
pub trait StatusController: Send + Sync {
    /// Register a project. A freshly added project has no build state.
    fn add_project(&self, project_id: &str);

    /// Deregister a project and drop its state.
    fn delete_project(&self, project_id: &str);

    /// Record a build-state transition with its message key and localised text.
    fn update_build_state(
        &self,
        project_id: &str,
        state: BuildState,
        key: &str,
        message: Option<String>,
    );

    /// Current build state, or `None` for unknown/stateless projects.
    fn build_state(&self, project_id: &str) -> Option<BuildState>;
}
