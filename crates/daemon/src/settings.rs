// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings merger: handler defaults first, `.cw-settings` last.

use std::path::Path;

use cw_core::{ProjectHandler, ProjectInfo, ProjectSettings};
use tracing::{debug, warn};

/// Name of the per-project override file at the project location.
pub const SETTINGS_FILE: &str = ".cw-settings";

/// Read and parse `<location>/.cw-settings`. Absent file → `None`;
/// malformed JSON is logged and treated as absent.
pub fn read_settings(location: &Path) -> Option<ProjectSettings> {
    let path = location.join(SETTINGS_FILE);
    let contents = std::fs::read_to_string(&path).ok()?;
    match ProjectSettings::parse(&contents) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed settings file");
            None
        }
    }
}

/// Apply handler defaults, then settings on top (settings win).
pub fn merge_settings(
    info: &mut ProjectInfo,
    handler: &dyn ProjectHandler,
    settings: Option<&ProjectSettings>,
) {
    let internal_port =
        settings.and_then(|s| s.internal_port.as_deref()).map(str::trim).filter(|p| !p.is_empty());

    // Defaults: only fill slots the prior record leaves empty.
    if internal_port.is_none() && info.app_ports.is_empty() {
        for port in handler.default_app_ports() {
            info.app_ports.push(port);
        }
    }
    if info.debug_port.is_none() {
        info.debug_port = handler.default_debug_port();
    }
    if info.ignored_paths.is_none() {
        info.ignored_paths = handler.default_ignored_paths();
    }

    let Some(settings) = settings else { return };

    if let Some(port) = internal_port {
        info.set_app_port(port);
    }

    if let Some(port) = settings.internal_debug_port.as_deref() {
        let port = port.trim();
        if !port.is_empty() {
            info.debug_port = Some(port.to_string());
        }
    }

    if let Some(paths) = &settings.ignored_paths {
        let filtered: Vec<String> =
            paths.iter().filter(|p| !p.trim().is_empty()).cloned().collect();
        if filtered.is_empty() {
            debug!(project_id = %info.project_id, "discarding empty ignoredPaths setting");
        } else {
            info.ignored_paths = Some(filtered);
        }
    }

    if let Some(raw) = settings.context_root.as_deref() {
        info.set_context_root(raw);
    }
    if let Some(raw) = settings.health_check.as_deref() {
        info.set_health_check(raw);
    }

    if let Some(profiles) = &settings.maven_profiles {
        match clean_list(profiles) {
            Some(profiles) => info.maven_profiles = Some(profiles),
            None => {
                warn!(project_id = %info.project_id, "rejecting mavenProfiles with empty entries");
            }
        }
    }
    if let Some(properties) = &settings.maven_properties {
        match clean_list(properties) {
            Some(properties) => info.maven_properties = Some(properties),
            None => {
                warn!(project_id = %info.project_id, "rejecting mavenProperties with empty entries");
            }
        }
    }

    if let Some(watched) = &settings.watched_files {
        if let Some(include) = &watched.include_files {
            match clean_list(include) {
                Some(include) => info.watched_files = Some(include),
                None => {
                    warn!(project_id = %info.project_id, "rejecting includeFiles with empty entries");
                }
            }
        }
        if let Some(exclude) = &watched.exclude_files {
            match clean_list(exclude) {
                Some(exclude) => info.ignored_files = Some(exclude),
                None => {
                    warn!(project_id = %info.project_id, "rejecting excludeFiles with empty entries");
                }
            }
        }
    }
}

/// Trim every entry; the whole list is rejected (→ `None`) when it is empty
/// or any trimmed entry is empty. Settings apply whole or not at all.
fn clean_list(values: &[String]) -> Option<Vec<String>> {
    if values.is_empty() {
        return None;
    }
    let trimmed: Vec<String> = values.iter().map(|v| v.trim().to_string()).collect();
    if trimmed.iter().any(String::is_empty) {
        return None;
    }
    Some(trimmed)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
