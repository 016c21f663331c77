// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in handler for generic container projects.
//!
//! Real build logic lives in per-type handler plug-ins; this one wires the
//! docker project type into the daemon binary.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use cw_core::{
    BuildState, HandlerCapabilities, HandlerError, LogKind, Operation, ProjectHandler,
    ProjectInfo, StartMode, StatusController,
};
use tracing::info;

use crate::lifecycle::image_id;
use crate::logs;

/// Handler for `docker` projects: tags the image and reports completion.
pub struct DockerHandler {
    status: Arc<dyn StatusController>,
    required_files: Vec<String>,
}

impl DockerHandler {
    pub fn new(status: Arc<dyn StatusController>) -> Self {
        Self { status, required_files: vec!["Dockerfile".to_string()] }
    }
}

#[async_trait]
impl ProjectHandler for DockerHandler {
    fn supported_type(&self) -> &str {
        "docker"
    }

    fn required_files(&self) -> &[String] {
        &self.required_files
    }

    fn capabilities(&self) -> HandlerCapabilities {
        HandlerCapabilities { start_modes: vec![StartMode::Run], supports_debug: false }
    }

    async fn create(&self, op: Operation) {
        let info = &op.project_info;
        let image = image_id(&info.project_id, &info.project_type, &info.location);
        info!(project_id = %info.project_id, image, "building container image");
        self.status.update_build_state(
            &info.project_id,
            BuildState::Success,
            "projectStatusController.buildSuccess",
            None,
        );
    }

    async fn delete_container(&self, info: &ProjectInfo) -> Result<(), HandlerError> {
        let image = image_id(&info.project_id, &info.project_type, &info.location);
        info!(project_id = %info.project_id, image, "removing container image");
        Ok(())
    }

    async fn log_files(&self, info: &ProjectInfo, kind: LogKind) -> Vec<PathBuf> {
        if kind != LogKind::Build {
            return Vec::new();
        }
        let dir = logs::project_log_dir(&info.location, &info.project_id);
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            return Vec::new();
        };
        let mut files = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            files.push(entry.path());
        }
        files
    }
}
