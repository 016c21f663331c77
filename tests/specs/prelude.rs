// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixture for the scenario tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cw_core::test_support::{FakeHandler, RecordingBus};
use cw_core::{EnglishCatalog, PortalEvent, StaticRegistry};
use cw_daemon::{Config, Coordinator, CreateRequest, InMemoryStatus};
use tempfile::TempDir;

pub struct Harness {
    pub coordinator: Arc<Coordinator>,
    pub status: Arc<InMemoryStatus>,
    pub bus: Arc<RecordingBus>,
    pub handler: Arc<FakeHandler>,
    pub root: TempDir,
}

pub fn harness(max_builds: usize, handler: FakeHandler) -> Harness {
    let root = tempfile::tempdir().expect("tempdir");
    let mut config = Config::for_testing(root.path());
    config.max_builds = max_builds;
    let status = Arc::new(InMemoryStatus::new());
    let bus = Arc::new(RecordingBus::new());
    let handler = Arc::new(handler);
    let mut registry = StaticRegistry::new();
    registry.register(handler.clone());
    let coordinator = Coordinator::new(
        config,
        Arc::new(registry),
        status.clone(),
        bus.clone(),
        Arc::new(EnglishCatalog),
    );
    Harness { coordinator, status, bus, handler, root }
}

impl Harness {
    pub fn location(&self, name: &str) -> PathBuf {
        let dir = self.root.path().join("workspace").join(name);
        std::fs::create_dir_all(&dir).expect("project dir");
        dir
    }

    pub async fn create(&self, project_id: &str) {
        let req = CreateRequest {
            project_id: project_id.to_string(),
            project_type: "docker".to_string(),
            location: self.location(project_id),
            start_mode: None,
            extension_id: None,
        };
        let result = self.coordinator.create(req).await.expect("create");
        assert_eq!(result.status_code, 202);
    }

    pub async fn wait_for_event(&self, matches: impl Fn(&PortalEvent) -> bool) -> PortalEvent {
        for _ in 0..200 {
            if let Some(event) = self.bus.events().into_iter().find(&matches) {
                return event;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("event never arrived; saw {:?}", self.bus.events());
    }
}
