// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build scheduler: bounded FIFO admission with a 5-second reconciliation tick.
//!
//! The scheduler owns `build_queue` and `running_builds` exclusively. A
//! project appears in at most one of the two collections; enqueue is
//! idempotent by project id. Handler invocations happen outside the state
//! lock (lock order: cache → scheduler → status).

use std::collections::VecDeque;
use std::sync::Arc;

use cw_core::{
    BuildState, EventBus, Operation, PortalEvent, ProjectHandler, StatusController, Translator,
};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::watcher::WatcherSupervisor;

/// One pending or in-flight build.
pub struct BuildQueueEntry {
    pub operation: Operation,
    pub handler: Arc<dyn ProjectHandler>,
}

impl BuildQueueEntry {
    pub fn new(operation: Operation, handler: Arc<dyn ProjectHandler>) -> Self {
        Self { operation, handler }
    }

    fn project_id(&self) -> &str {
        &self.operation.project_info.project_id
    }
}

#[derive(Default)]
struct SchedulerState {
    build_queue: VecDeque<BuildQueueEntry>,
    running_builds: Vec<BuildQueueEntry>,
}

impl SchedulerState {
    fn contains(&self, project_id: &str) -> bool {
        self.build_queue.iter().any(|e| e.project_id() == project_id)
            || self.running_builds.iter().any(|e| e.project_id() == project_id)
    }
}

/// Admits queued builds under the global concurrency cap and reaps finished
/// ones on a periodic tick.
pub struct BuildScheduler {
    state: Mutex<SchedulerState>,
    max_builds: usize,
    config: Arc<Config>,
    status: Arc<dyn StatusController>,
    bus: Arc<dyn EventBus>,
    translator: Arc<dyn Translator>,
    watcher: Arc<WatcherSupervisor>,
    tick_requested: Notify,
}

impl BuildScheduler {
    pub fn new(
        config: Arc<Config>,
        status: Arc<dyn StatusController>,
        bus: Arc<dyn EventBus>,
        translator: Arc<dyn Translator>,
        watcher: Arc<WatcherSupervisor>,
    ) -> Self {
        Self {
            state: Mutex::new(SchedulerState::default()),
            max_builds: config.max_builds,
            config,
            status,
            bus,
            translator,
            watcher,
            tick_requested: Notify::new(),
        }
    }

    /// Append an entry to the build queue unless the project is already
    /// queued or running. Returns whether the entry was admitted.
    pub fn enqueue(&self, entry: BuildQueueEntry) -> bool {
        let admitted = {
            let mut state = self.state.lock();
            if state.contains(entry.project_id()) {
                debug!(project_id = entry.project_id(), "build already pending, enqueue is a no-op");
                false
            } else {
                state.build_queue.push_back(entry);
                true
            }
        };
        if admitted {
            self.emit_ranks();
            self.request_tick();
        }
        admitted
    }

    /// Drop a queued build. Ranks are re-broadcast when an entry was removed.
    pub fn remove_from_queue(&self, project_id: &str) -> bool {
        let removed = {
            let mut state = self.state.lock();
            let before = state.build_queue.len();
            state.build_queue.retain(|e| e.project_id() != project_id);
            let removed = before - state.build_queue.len();
            debug_assert!(removed <= 1, "project {project_id} queued more than once");
            removed > 0
        };
        if removed {
            self.emit_ranks();
        }
        removed
    }

    /// Drop an in-flight build (the handler, if already running, is left to
    /// finish; its terminal state no longer matters).
    pub fn remove_running(&self, project_id: &str) -> bool {
        let mut state = self.state.lock();
        let before = state.running_builds.len();
        state.running_builds.retain(|e| e.project_id() != project_id);
        before != state.running_builds.len()
    }

    /// Coalesced manual tick request: any number of requests while a tick is
    /// running collapse into at most one additional tick afterwards.
    pub fn request_tick(&self) {
        self.tick_requested.notify_one();
    }

    pub fn queued_len(&self) -> usize {
        self.state.lock().build_queue.len()
    }

    pub fn running_len(&self) -> usize {
        self.state.lock().running_builds.len()
    }

    /// One reconciliation pass: reap terminal builds, admit queued ones up
    /// to the cap, re-broadcast ranks when the queue composition changed.
    pub async fn tick(&self) {
        let candidates = {
            let mut state = self.state.lock();

            state.running_builds.retain(|entry| {
                match self.status.build_state(entry.project_id()) {
                    Some(build_state) if build_state.is_terminal() => {
                        info!(project_id = entry.project_id(), state = %build_state, "build finished");
                        false
                    }
                    _ => true,
                }
            });

            let open_slots = self.max_builds.saturating_sub(state.running_builds.len());
            let take = open_slots.min(state.build_queue.len());
            let candidates: Vec<BuildQueueEntry> =
                state.build_queue.drain(..take).collect();
            debug_assert!(state.running_builds.len() <= self.max_builds);
            candidates
        };

        if candidates.is_empty() {
            return;
        }

        let mut started = Vec::new();
        for entry in candidates {
            if self.trigger_build(&entry).await {
                started.push(entry);
            }
        }

        {
            let mut state = self.state.lock();
            state.running_builds.extend(started);
            debug_assert!(state.running_builds.len() <= self.max_builds);
        }
        self.emit_ranks();
    }

    /// Start one admitted build. Returns `false` when required files are
    /// missing: the project goes straight to `Failed` and never enters the
    /// running set (the reap step would drop it anyway on terminal state).
    async fn trigger_build(&self, entry: &BuildQueueEntry) -> bool {
        let info = &entry.operation.project_info;
        let project_id = &info.project_id;

        let missing = entry
            .handler
            .required_files()
            .iter()
            .find(|required| !info.location.join(required.trim_start_matches('/')).exists());
        if let Some(missing) = missing {
            warn!(%project_id, file = %missing, "required file missing, failing build");
            let message = self
                .translator
                .translation("buildscripts.buildFailMissingFile", &[("file", missing.as_str())]);
            self.status.update_build_state(
                project_id,
                BuildState::Failed,
                "buildscripts.buildFailMissingFile",
                Some(message),
            );
            return false;
        }

        let message = self.translator.translation("projectStatusController.buildStarted", &[]);
        self.status.update_build_state(
            project_id,
            BuildState::InProgress,
            "projectStatusController.buildStarted",
            Some(message),
        );

        // Fire and forget: the handler reports a terminal state through the
        // status controller and the next tick reaps it.
        let handler = Arc::clone(&entry.handler);
        let operation = entry.operation.clone();
        info!(%project_id, operation_id = %operation.operation_id, "triggering build");
        tokio::spawn(async move { handler.create(operation).await });

        self.watcher.start(info).await;

        self.bus.emit(PortalEvent::NewProjectAdded {
            project_id: project_id.clone(),
            ignored_paths: info.ignored_paths.clone(),
        });
        true
    }

    /// Send every queued project its 1-indexed rank `i/N`.
    pub fn emit_ranks(&self) {
        let queued: Vec<(String, usize)> = {
            let state = self.state.lock();
            state
                .build_queue
                .iter()
                .enumerate()
                .map(|(index, entry)| (entry.project_id().to_string(), index + 1))
                .collect()
        };
        let total = queued.len();
        for (project_id, position) in queued {
            let rank = format!("{position}/{total}");
            let message = self
                .translator
                .translation("projectStatusController.buildRank", &[("rank", rank.as_str())]);
            self.status.update_build_state(
                &project_id,
                BuildState::Queued,
                "projectStatusController.buildRank",
                Some(message),
            );
        }
    }

    /// Supervisor loop: periodic ticks plus coalesced manual requests.
    pub async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = self.tick_requested.notified() => {}
            }
            self.tick().await;
        }
    }

    /// Truncate both collections. Callers stop the projects themselves.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        state.build_queue.clear();
        state.running_builds.clear();
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
