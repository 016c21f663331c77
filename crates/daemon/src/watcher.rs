// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watcher supervisor: one long-lived filesystem-watcher child per project.
//!
//! Spawned PIDs are tracked in memory; the `ps` scan with the exact-location
//! matcher runs as the recovery path so watchers from a crashed daemon are
//! still reaped.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use cw_core::ProjectInfo;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Starts, stops, and reaps per-project watcher children.
///
/// Every operation is a no-op in a cluster-managed environment: there the
/// cluster owns child processes, not this daemon.
pub struct WatcherSupervisor {
    config: Arc<Config>,
    pids: Mutex<HashMap<String, u32>>,
}

impl WatcherSupervisor {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config, pids: Mutex::new(HashMap::new()) }
    }

    /// Spawn one detached watcher child for the project.
    pub async fn start(&self, info: &ProjectInfo) {
        if self.config.in_cluster {
            return;
        }

        let watched_csv = match &info.watched_files {
            Some(files) => files.join(","),
            // Generic container projects without an explicit watch list
            // watch the whole location.
            None if info.project_type == "docker" => {
                format!("{}/", info.location.display())
            }
            None => String::new(),
        };
        let ignored_csv = info.ignored_files.as_ref().map(|f| f.join(",")).unwrap_or_default();

        let mut command = tokio::process::Command::new(&self.config.watcher_script);
        command
            .arg(&info.location)
            .arg(&self.config.workspace_origin)
            .arg(&info.project_id)
            .arg("localhost")
            .arg(&watched_csv)
            .arg(&ignored_csv)
            .arg("")
            .arg(self.config.portal_port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        match command.spawn() {
            Ok(child) => {
                if let Some(pid) = child.id() {
                    info!(project_id = %info.project_id, pid, "watcher started");
                    self.pids.lock().insert(info.project_id.clone(), pid);
                }
            }
            Err(e) => {
                warn!(project_id = %info.project_id, error = %e, "failed to start watcher");
            }
        }
    }

    /// Kill the tracked watcher, then sweep the process table for stragglers
    /// referencing the project location.
    pub async fn stop(&self, project_id: &str, location: &Path) {
        if self.config.in_cluster {
            return;
        }
        if let Some(pid) = self.pids.lock().remove(project_id) {
            kill_pid(pid);
        }
        self.reap_stale(location).await;
    }

    /// Shutdown sweep over every tracked watcher.
    pub async fn stop_all(&self) {
        if self.config.in_cluster {
            return;
        }
        let pids: Vec<(String, u32)> = self.pids.lock().drain().collect();
        for (project_id, pid) in pids {
            debug!(%project_id, pid, "stopping watcher");
            kill_pid(pid);
        }
    }

    /// Recovery path: scan `ps` output for watcher processes whose command
    /// line references the exact project location.
    async fn reap_stale(&self, location: &Path) {
        let output = match tokio::process::Command::new("ps").args(["axo", "pid,args"]).output().await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "failed to scan process table");
                return;
            }
        };
        let listing = String::from_utf8_lossy(&output.stdout);
        for pid in watcher_pids(&listing, &self.config.watcher_script, location) {
            info!(pid, location = %location.display(), "reaping stale watcher");
            kill_pid(pid);
        }
    }
}

/// PIDs of watcher processes for `location` in a `ps axo pid,args` listing.
///
/// Two identifiers are matched, both with the location terminated (by a
/// space or `/`) so `/ws/app` never matches a watcher for `/ws/app2`:
/// - the watcher script path followed by `"<location> "`
/// - an inotify watcher whose arguments contain `"<location>/"`
pub(crate) fn watcher_pids(listing: &str, script: &Path, location: &Path) -> Vec<u32> {
    let script_sig = format!("{} {} ", script.display(), location.display());
    let inotify_sig = format!("{}/", location.display());

    let mut pids = Vec::new();
    for line in listing.lines().skip(1) {
        let line = line.trim_start();
        let Some((pid, args)) = line.split_once(char::is_whitespace) else { continue };
        let Ok(pid) = pid.parse::<u32>() else { continue };
        let matched = args.contains(&script_sig)
            || (args.contains("inotifywait") && args.contains(&inotify_sig));
        if matched {
            pids.push(pid);
        }
    }
    pids
}

/// SIGKILL one PID; per-PID failures are logged and swallowed.
fn kill_pid(pid: u32) {
    if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        warn!(pid, error = %e, "failed to kill watcher process");
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
