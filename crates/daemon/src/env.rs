// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use cw_core::LifecycleError;

/// Builds admitted concurrently when `MC_MAX_BUILDS` is unset or invalid.
pub const DEFAULT_MAX_BUILDS: usize = 3;

/// Global build-concurrency cap. Zero and non-integers fall back to the default.
pub fn max_builds() -> usize {
    std::env::var("MC_MAX_BUILDS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_BUILDS)
}

/// In a cluster-managed environment the watcher supervisor is a no-op:
/// child processes are owned by the cluster, not this daemon.
pub fn in_cluster() -> bool {
    std::env::var("IN_K8")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Portal port handed to watcher children: 9191 behind HTTPS, 9090 otherwise.
pub fn portal_port() -> u16 {
    if std::env::var("PORTAL_HTTPS").map(|v| v == "true").unwrap_or(false) {
        9191
    } else {
        9090
    }
}

/// Resolve data directory: CW_DATA_DIR > ~/.cw
pub fn data_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("CW_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".cw"))
        .ok_or_else(|| LifecycleError::Internal("cannot resolve a home directory".to_string()))
}

/// Workspace root containing user projects.
pub fn workspace_origin() -> PathBuf {
    std::env::var("CW_WORKSPACE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/cw-workspace"))
}

/// Path of the project-watcher script spawned per project.
pub fn watcher_script() -> PathBuf {
    std::env::var("CW_WATCHER_SCRIPT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/usr/local/bin/cw-project-watcher"))
}

/// Reconciliation tick interval (override for tests via `CW_TICK_MS`).
pub fn tick_interval() -> Duration {
    std::env::var("CW_TICK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Attempt cap for the log-file poll before giving up.
pub fn log_retries() -> u32 {
    std::env::var("CW_LOG_RETRIES").ok().and_then(|s| s.parse::<u32>().ok()).unwrap_or(10)
}

/// Delay between log-file poll attempts.
pub fn log_retry_delay() -> Duration {
    std::env::var("CW_LOG_RETRY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(500))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
