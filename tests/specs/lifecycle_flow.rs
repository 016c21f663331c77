// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end create → build → delete flow.

use super::prelude::*;
use cw_core::test_support::FakeHandler;
use cw_core::{BuildState, OperationKind, PortalEvent, StatusController};
use std::time::Duration;

#[tokio::test]
async fn create_then_tick_reaches_in_progress_with_default_ports() {
    let h = harness(3, FakeHandler::new("docker").with_app_ports(&["8080"]));
    h.create("p1").await;

    assert_eq!(h.status.build_state("p1"), Some(BuildState::Queued));

    let info = h.coordinator.store().load_by_id("p1", false).expect("info");
    assert_eq!(info.app_ports, vec!["8080"]);

    h.coordinator.scheduler().tick().await;
    assert_eq!(h.status.build_state("p1"), Some(BuildState::InProgress));

    h.wait_for_event(|e| matches!(e, PortalEvent::NewProjectAdded { .. })).await;
    tokio::task::yield_now().await;
    let created = h.handler.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].kind, OperationKind::Create);
    assert_eq!(created[0].project_info.project_id, "p1");
}

#[tokio::test]
async fn delete_leaves_no_metadata_behind() {
    let h = harness(3, FakeHandler::new("docker"));
    h.create("p1").await;
    h.coordinator.scheduler().tick().await;

    let store = h.coordinator.store();
    let info_file = store.info_file("p1");
    for _ in 0..200 {
        if info_file.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(info_file.exists(), "info file was never persisted");

    h.coordinator.delete("p1").await.expect("delete");
    h.wait_for_event(|e| matches!(e, PortalEvent::ProjectDeletion { .. })).await;

    assert!(!store.project_dir("p1").exists());
    assert!(!store.cached(&info_file));
    assert_eq!(store.load_by_id("p1", true), None);
    assert!(!h.status.registered("p1"));
}

#[tokio::test]
async fn conflicting_recreation_is_rejected_with_a_clear_message() {
    let h = harness(3, FakeHandler::new("docker"));
    h.create("p1").await;

    let req = cw_daemon::CreateRequest {
        project_id: "p1".to_string(),
        project_type: "nodejs".to_string(),
        location: h.location("p1"),
        start_mode: None,
        extension_id: None,
    };
    let err = h.coordinator.create(req).await.expect_err("conflict");
    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("exists"));
}
