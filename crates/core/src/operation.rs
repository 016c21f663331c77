// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle operations: one per admitted request.

use crate::project::ProjectInfo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What an operation asks the handler to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Create,
    Delete,
    Update,
    Validate,
    Build,
    EnableAutoBuild,
    DisableAutoBuild,
    ReconfigWatchedFiles,
}

crate::simple_display! {
    OperationKind {
        Create => "create",
        Delete => "delete",
        Update => "update",
        Validate => "validate",
        Build => "build",
        EnableAutoBuild => "enableAutoBuild",
        DisableAutoBuild => "disableAutoBuild",
        ReconfigWatchedFiles => "reconfigWatchedFiles",
    }
}

/// A tagged lifecycle request carrying a fresh operation id and the target
/// project record. Created at request admission, consumed by the handler,
/// referenced in status and log emissions. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operation_id: String,
    pub kind: OperationKind,
    pub project_info: ProjectInfo,
}

impl Operation {
    /// Build an operation with a fresh opaque id.
    pub fn new(kind: OperationKind, project_info: ProjectInfo) -> Self {
        Self { operation_id: Uuid::new_v4().to_string(), kind, project_info }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
