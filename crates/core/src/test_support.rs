// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake collaborators and fixtures shared by unit and spec tests.

use crate::event::{EventBus, PortalEvent};
use crate::handler::{HandlerCapabilities, HandlerError, LogKind, ProjectHandler};
use crate::operation::Operation;
use crate::project::{ProjectInfo, StartMode};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Build a minimal valid `ProjectInfo` for tests.
pub fn make_info(project_id: &str, project_type: &str, location: &Path) -> ProjectInfo {
    ProjectInfo::new(project_id, project_type, location)
}

/// Configurable in-memory handler that records the operations it receives.
pub struct FakeHandler {
    project_type: String,
    required_files: Vec<String>,
    app_ports: Vec<String>,
    debug_port: Option<String>,
    ignored_paths: Option<Vec<String>>,
    capabilities: HandlerCapabilities,
    delete_error: Option<String>,
    created: Mutex<Vec<Operation>>,
    deleted: Mutex<Vec<String>>,
    logs: Mutex<HashMap<LogKind, Vec<PathBuf>>>,
}

impl FakeHandler {
    pub fn new(project_type: &str) -> Self {
        Self {
            project_type: project_type.to_string(),
            required_files: Vec::new(),
            app_ports: Vec::new(),
            debug_port: None,
            ignored_paths: None,
            capabilities: HandlerCapabilities {
                start_modes: vec![StartMode::Run, StartMode::Debug],
                supports_debug: true,
            },
            delete_error: None,
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            logs: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_required_files(mut self, files: &[&str]) -> Self {
        self.required_files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_app_ports(mut self, ports: &[&str]) -> Self {
        self.app_ports = ports.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_debug_port(mut self, port: &str) -> Self {
        self.debug_port = Some(port.to_string());
        self
    }

    pub fn with_ignored_paths(mut self, paths: &[&str]) -> Self {
        self.ignored_paths = Some(paths.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn with_start_modes(mut self, modes: &[StartMode]) -> Self {
        self.capabilities.start_modes = modes.to_vec();
        self
    }

    pub fn with_delete_error(mut self, message: &str) -> Self {
        self.delete_error = Some(message.to_string());
        self
    }

    /// Set the log files `log_files` will report for a kind.
    pub fn set_logs(&self, kind: LogKind, files: &[&str]) {
        self.logs.lock().insert(kind, files.iter().map(PathBuf::from).collect());
    }

    /// Operations passed to `create`, in arrival order.
    pub fn created(&self) -> Vec<Operation> {
        self.created.lock().clone()
    }

    /// Project ids passed to `delete_container`.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().clone()
    }
}

#[async_trait]
impl ProjectHandler for FakeHandler {
    fn supported_type(&self) -> &str {
        &self.project_type
    }

    fn required_files(&self) -> &[String] {
        &self.required_files
    }

    fn default_app_ports(&self) -> Vec<String> {
        self.app_ports.clone()
    }

    fn default_debug_port(&self) -> Option<String> {
        self.debug_port.clone()
    }

    fn default_ignored_paths(&self) -> Option<Vec<String>> {
        self.ignored_paths.clone()
    }

    fn capabilities(&self) -> HandlerCapabilities {
        self.capabilities.clone()
    }

    async fn create(&self, op: Operation) {
        self.created.lock().push(op);
    }

    async fn delete_container(&self, info: &ProjectInfo) -> Result<(), HandlerError> {
        self.deleted.lock().push(info.project_id.clone());
        match &self.delete_error {
            Some(message) => Err(HandlerError(message.clone())),
            None => Ok(()),
        }
    }

    async fn log_files(&self, _info: &ProjectInfo, kind: LogKind) -> Vec<PathBuf> {
        self.logs.lock().get(&kind).cloned().unwrap_or_default()
    }
}

/// Event bus that records every emission for later assertions.
#[derive(Default)]
pub struct RecordingBus {
    events: Mutex<Vec<PortalEvent>>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PortalEvent> {
        self.events.lock().clone()
    }
}

impl EventBus for RecordingBus {
    fn emit(&self, event: PortalEvent) {
        self.events.lock().push(event);
    }
}
