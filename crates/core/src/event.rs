// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events delivered to the portal through the socket event bus.

use crate::handler::LogKind;
use serde::{Deserialize, Serialize};

/// Outcome of an asynchronous project deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeletionStatus {
    Success,
    Failed,
}

crate::simple_display! {
    DeletionStatus {
        Success => "success",
        Failed => "failed",
    }
}

/// Events the core emits toward the portal.
///
/// Serializes with `{"type": "eventName", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PortalEvent {
    /// A build was triggered for a newly admitted project.
    #[serde(rename = "newProjectAdded")]
    #[serde(rename_all = "camelCase")]
    NewProjectAdded {
        project_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ignored_paths: Option<Vec<String>>,
    },

    /// Asynchronous deletion finished.
    #[serde(rename = "projectDeletion")]
    #[serde(rename_all = "camelCase")]
    ProjectDeletion {
        operation_id: String,
        project_id: String,
        status: DeletionStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// The set of known log files changed for one log kind.
    #[serde(rename = "projectLogsListChanged")]
    #[serde(rename_all = "camelCase")]
    ProjectLogsListChanged { project_id: String, kind: LogKind },
}

/// Fire-and-forget event delivery toward the portal.
pub trait EventBus: Send + Sync {
    fn emit(&self, event: PortalEvent);
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
