// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project record, start modes, and derived metadata paths.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a project's application is launched after a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartMode {
    #[default]
    #[serde(rename = "run")]
    Run,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "debugNoInit")]
    DebugNoInit,
}

impl StartMode {
    /// Parse the wire form (`run`, `debug`, `debugNoInit`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "run" => Some(StartMode::Run),
            "debug" => Some(StartMode::Debug),
            "debugNoInit" => Some(StartMode::DebugNoInit),
            _ => None,
        }
    }
}

crate::simple_display! {
    StartMode {
        Run => "run",
        Debug => "debug",
        DebugNoInit => "debugNoInit",
    }
}

/// Canonical per-project record.
///
/// One JSON document per project is persisted under the projects data
/// directory; the camelCase field names below are the on-disk format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub project_id: String,
    pub project_type: String,
    pub location: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_id: Option<String>,
    #[serde(default = "default_true")]
    pub auto_build_enabled: bool,
    #[serde(default)]
    pub start_mode: StartMode,
    /// Holds at most one element: the status-ping port.
    #[serde(default)]
    pub app_ports: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_paths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven_profiles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven_properties: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}

impl ProjectInfo {
    pub fn new(project_id: impl Into<String>, project_type: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            project_id: project_id.into(),
            project_type: project_type.into(),
            location: location.into(),
            extension_id: None,
            auto_build_enabled: true,
            start_mode: StartMode::default(),
            app_ports: Vec::new(),
            debug_port: None,
            context_root: None,
            health_check: None,
            watched_files: None,
            ignored_files: None,
            ignored_paths: None,
            maven_profiles: None,
            maven_properties: None,
        }
    }

    /// Project display name: the last component of the location.
    pub fn name(&self) -> String {
        self.location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.project_id.clone())
    }

    /// Replace the single app-port slot (pop then push).
    ///
    /// `app_ports` is a sequence on the wire but holds at most one element.
    pub fn set_app_port(&mut self, port: impl Into<String>) {
        self.app_ports.pop();
        self.app_ports.push(port.into());
    }

    /// Set the context root, normalised to exactly one leading `/` and no
    /// trailing `/`. Blank input leaves the field unset.
    pub fn set_context_root(&mut self, raw: &str) {
        if let Some(v) = normalize_abs_path(raw) {
            self.context_root = Some(v);
        }
    }

    /// Set the health-check path with the same slash rule as the context root.
    pub fn set_health_check(&mut self, raw: &str) {
        if let Some(v) = normalize_abs_path(raw) {
            self.health_check = Some(v);
        }
    }
}

/// Normalise a user-supplied absolute path fragment: trim whitespace, strip
/// leading and trailing slashes, then prefix exactly one `/`.
///
/// `" //foo// "` → `/foo`; `"/"` → `/`; blank input → `None`.
pub fn normalize_abs_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let inner = trimmed.trim_matches('/');
    Some(format!("/{inner}"))
}

/// Filesystem locations derived from a project id and the daemon's data roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// `<data_root>/<project_id>/`
    pub dir: PathBuf,
    /// `<data_root>/<project_id>/<project_id>.json`
    pub info_file: PathBuf,
    /// `<logs_root>/<project_name>-<project_id>/`
    pub log_dir: PathBuf,
}

impl ProjectMetadata {
    pub fn new(data_root: &Path, logs_root: &Path, project_id: &str, project_name: &str) -> Self {
        let dir = data_root.join(project_id);
        let info_file = dir.join(format!("{project_id}.json"));
        let log_dir = logs_root.join(format!("{project_name}-{project_id}"));
        Self { dir, info_file, log_dir }
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
