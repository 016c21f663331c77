// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cw_core::test_support::{FakeHandler, RecordingBus};
use cw_core::{EnglishCatalog, PortalEvent, StaticRegistry};
use tempfile::TempDir;

use super::{Coordinator, CreateRequest};
use crate::config::Config;
use crate::status::InMemoryStatus;

pub(crate) struct Fixture {
    pub coordinator: Arc<Coordinator>,
    pub status: Arc<InMemoryStatus>,
    pub bus: Arc<RecordingBus>,
    pub handler: Arc<FakeHandler>,
    pub root: TempDir,
}

pub(crate) fn fixture() -> Fixture {
    fixture_with(FakeHandler::new("docker"))
}

pub(crate) fn fixture_with(handler: FakeHandler) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let config = Config::for_testing(root.path());
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
    Fixture { coordinator, status, bus, handler, root }
}

impl Fixture {
    /// Create the project directory on disk and return its path.
    pub(crate) fn location(&self, name: &str) -> PathBuf {
        let dir = self.root.path().join("workspace").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub(crate) fn create_req(&self, project_id: &str, project_type: &str, name: &str) -> CreateRequest {
        CreateRequest {
            project_id: project_id.to_string(),
            project_type: project_type.to_string(),
            location: self.location(name),
            start_mode: None,
            extension_id: None,
        }
    }

    /// Wait until the bus has at least `count` events and return them.
    pub(crate) async fn wait_for_events(&self, count: usize) -> Vec<PortalEvent> {
        for _ in 0..200 {
            let events = self.bus.events();
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {count} portal events, got {:?}", self.bus.events());
    }
}
