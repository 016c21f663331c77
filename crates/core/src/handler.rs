// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project-type handler plug-ins and their registry.

use crate::error::LifecycleError;
use crate::operation::Operation;
use crate::project::{ProjectInfo, StartMode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Which log bundle a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    App,
    Build,
}

crate::simple_display! {
    LogKind {
        App => "app",
        Build => "build",
    }
}

/// Failure reported by a handler during create or delete.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

/// Start modes and debug support a handler advertises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerCapabilities {
    pub start_modes: Vec<StartMode>,
    pub supports_debug: bool,
}

impl HandlerCapabilities {
    pub fn supports(&self, mode: StartMode) -> bool {
        self.start_modes.contains(&mode)
    }
}

impl Default for HandlerCapabilities {
    fn default() -> Self {
        Self { start_modes: vec![StartMode::Run], supports_debug: false }
    }
}

/// A plug-in that knows how to build, delete, and describe projects of one type.
///
/// `create` is fire-and-forget: the scheduler spawns it and learns about
/// completion through the status controller on a later tick.
#[async_trait]
pub trait ProjectHandler: Send + Sync {
    /// The project type this handler serves (`docker`, `nodejs`, ...).
    fn supported_type(&self) -> &str;

    /// Files that must exist under the project location before a build starts.
    fn required_files(&self) -> &[String] {
        &[]
    }

    /// Default app ports applied when `.cw-settings` carries no `internalPort`.
    fn default_app_ports(&self) -> Vec<String> {
        Vec::new()
    }

    fn default_debug_port(&self) -> Option<String> {
        None
    }

    fn default_ignored_paths(&self) -> Option<Vec<String>> {
        None
    }

    fn capabilities(&self) -> HandlerCapabilities {
        HandlerCapabilities::default()
    }

    /// Build and deploy the project. The handler reports a terminal build
    /// state through the status controller when it is done.
    async fn create(&self, op: Operation);

    /// Tear down the project's container/runtime artifacts.
    async fn delete_container(&self, info: &ProjectInfo) -> Result<(), HandlerError>;

    /// Log files currently known for the project, per kind.
    async fn log_files(&self, info: &ProjectInfo, kind: LogKind) -> Vec<PathBuf>;
}

/// Resolves projects to handlers and answers type queries.
pub trait HandlerRegistry: Send + Sync {
    fn all_project_types(&self) -> Vec<String>;

    /// Sniff the project type from the location's contents.
    fn determine_project_type(&self, location: &Path) -> Result<String, LifecycleError>;

    fn handler_for(&self, project_type: &str) -> Option<Arc<dyn ProjectHandler>>;
}

/// Map-backed registry used by the daemon binary and tests.
#[derive(Default)]
pub struct StaticRegistry {
    handlers: HashMap<String, Arc<dyn ProjectHandler>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ProjectHandler>) {
        self.handlers.insert(handler.supported_type().to_string(), handler);
    }
}

impl HandlerRegistry for StaticRegistry {
    fn all_project_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.handlers.keys().cloned().collect();
        types.sort();
        types
    }

    fn determine_project_type(&self, location: &Path) -> Result<String, LifecycleError> {
        if !location.exists() {
            return Err(LifecycleError::NotFound(format!(
                "project location {} does not exist",
                location.display()
            )));
        }
        for (marker, project_type) in
            [("Dockerfile", "docker"), ("package.json", "nodejs"), ("pom.xml", "maven")]
        {
            if location.join(marker).exists() && self.handlers.contains_key(project_type) {
                return Ok(project_type.to_string());
            }
        }
        Err(LifecycleError::NotFound(format!(
            "no registered handler recognises {}",
            location.display()
        )))
    }

    fn handler_for(&self, project_type: &str) -> Option<Arc<dyn ProjectHandler>> {
        self.handlers.get(project_type).cloned()
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
