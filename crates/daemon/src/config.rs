// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration resolved once at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cw_core::LifecycleError;

use crate::env;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root data directory (e.g. ~/.cw)
    pub data_dir: PathBuf,
    /// Per-project metadata directories and info files
    pub projects_data_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log files
    pub daemon_log_dir: PathBuf,
    /// Workspace root passed to watcher children
    pub workspace_origin: PathBuf,
    /// Project-watcher script spawned per project
    pub watcher_script: PathBuf,
    /// Portal port handed to watcher children
    pub portal_port: u16,
    /// When set, the watcher supervisor is a no-op
    pub in_cluster: bool,
    /// Global build-concurrency cap
    pub max_builds: usize,
    /// Reconciliation tick interval
    pub tick_interval: Duration,
    /// Attempt cap for the log-file poll
    pub log_retries: u32,
    /// Delay between log-file poll attempts
    pub log_retry_delay: Duration,
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self, LifecycleError> {
        let data_dir = env::data_dir()?;
        Ok(Self {
            projects_data_dir: data_dir.join("projects"),
            lock_path: data_dir.join("cwd.pid"),
            daemon_log_dir: data_dir.join("logs"),
            workspace_origin: env::workspace_origin(),
            watcher_script: env::watcher_script(),
            portal_port: env::portal_port(),
            in_cluster: env::in_cluster(),
            max_builds: env::max_builds(),
            tick_interval: env::tick_interval(),
            log_retries: env::log_retries(),
            log_retry_delay: env::log_retry_delay(),
            data_dir,
        })
    }

    /// Configuration rooted at a temp directory, with the watcher supervisor
    /// disabled so tests never touch the process table.
    pub fn for_testing(root: &Path) -> Self {
        Self {
            data_dir: root.to_path_buf(),
            projects_data_dir: root.join("projects"),
            lock_path: root.join("cwd.pid"),
            daemon_log_dir: root.join("logs"),
            workspace_origin: root.join("workspace"),
            watcher_script: root.join("cw-project-watcher"),
            portal_port: 9090,
            in_cluster: true,
            max_builds: env::DEFAULT_MAX_BUILDS,
            tick_interval: Duration::from_millis(50),
            log_retries: 2,
            log_retry_delay: Duration::from_millis(1),
        }
    }
}
