// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::test_helpers::*;
use super::*;
use cw_core::test_support::FakeHandler;
use cw_core::{BuildState, DeletionStatus, OperationKind};
use std::time::Duration;

#[tokio::test]
async fn create_registers_persists_and_queues_the_project() {
    let fx = fixture_with(FakeHandler::new("docker").with_app_ports(&["8080"]));
    let req = fx.create_req("p1", "docker", "p1");
    let location = req.location.clone();

    let result = fx.coordinator.create(req).await.unwrap();
    assert_eq!(result.status_code, 202);
    assert!(!result.operation_id.is_empty());
    assert_eq!(result.build_log_path, crate::logs::build_log_path(&location, "p1"));

    // Registered and queued
    assert_eq!(fx.status.build_state("p1"), Some(BuildState::Queued));
    assert_eq!(fx.coordinator.scheduler().queued_len(), 1);

    // Merged and persisted
    let info = fx.coordinator.store().load_by_id("p1", false).unwrap();
    assert_eq!(info.app_ports, vec!["8080"]);

    // One tick later the build is in progress
    fx.coordinator.scheduler().tick().await;
    assert_eq!(fx.status.build_state("p1"), Some(BuildState::InProgress));
    tokio::task::yield_now().await;
    let created = fx.handler.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].kind, OperationKind::Create);
}

#[tokio::test]
async fn create_requires_all_identifying_fields() {
    let fx = fixture();
    let mut req = fx.create_req("", "docker", "p1");
    let err = fx.coordinator.create(req.clone()).await.unwrap_err();
    assert_eq!(err.status_code(), 400);

    req.project_id = "p1".to_string();
    req.project_type = String::new();
    let err = fx.coordinator.create(req).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn create_rejects_a_missing_location() {
    let fx = fixture();
    let req = CreateRequest {
        project_id: "p1".to_string(),
        project_type: "docker".to_string(),
        location: fx.root.path().join("nowhere"),
        start_mode: None,
        extension_id: None,
    };
    let err = fx.coordinator.create(req).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn create_rejects_an_unknown_project_type() {
    let fx = fixture();
    let req = fx.create_req("p1", "swift", "p1");
    let err = fx.coordinator.create(req).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn recreation_with_matching_identity_is_permitted() {
    let fx = fixture();
    let req = fx.create_req("p1", "docker", "p1");
    fx.coordinator.create(req.clone()).await.unwrap();
    fx.coordinator.scheduler().tick().await;

    let result = fx.coordinator.create(req).await.unwrap();
    assert_eq!(result.status_code, 202);
}

#[tokio::test]
async fn recreation_with_a_different_type_is_a_conflict() {
    let fx = fixture();
    fx.coordinator.create(fx.create_req("p1", "docker", "p1")).await.unwrap();

    let err = fx.coordinator.create(fx.create_req("p1", "nodejs", "p1")).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.to_string().contains("exists"));
}

#[tokio::test]
async fn recreation_at_a_different_location_is_a_conflict() {
    let fx = fixture();
    fx.coordinator.create(fx.create_req("p1", "docker", "p1")).await.unwrap();

    let err = fx.coordinator.create(fx.create_req("p1", "docker", "elsewhere")).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn create_validates_the_start_mode() {
    let fx = fixture_with(FakeHandler::new("docker").with_start_modes(&[cw_core::StartMode::Run]));

    let mut req = fx.create_req("p1", "docker", "p1");
    req.start_mode = Some("warp".to_string());
    let err = fx.coordinator.create(req).await.unwrap_err();
    assert_eq!(err.status_code(), 400);

    let mut req = fx.create_req("p1", "docker", "p1");
    req.start_mode = Some("debug".to_string());
    let err = fx.coordinator.create(req).await.unwrap_err();
    assert_eq!(err.status_code(), 400);

    let mut req = fx.create_req("p1", "docker", "p1");
    req.start_mode = Some("run".to_string());
    assert_eq!(fx.coordinator.create(req).await.unwrap().status_code, 202);
}

#[tokio::test]
async fn settings_file_overrides_handler_defaults() {
    let fx = fixture_with(FakeHandler::new("docker").with_app_ports(&["8080"]));
    let req = fx.create_req("p1", "docker", "p1");
    std::fs::write(
        req.location.join(".cw-settings"),
        r#"{"internalPort":"3000","contextRoot":" //foo// "}"#,
    )
    .unwrap();

    fx.coordinator.create(req).await.unwrap();
    let info = fx.coordinator.store().load_by_id("p1", false).unwrap();
    assert_eq!(info.app_ports, vec!["3000"]);
    assert_eq!(info.context_root.as_deref(), Some("/foo"));
}

#[tokio::test]
async fn delete_clears_every_trace_of_the_project() {
    let fx = fixture();
    fx.coordinator.create(fx.create_req("p1", "docker", "p1")).await.unwrap();
    fx.coordinator.scheduler().tick().await;

    let store = fx.coordinator.store();
    let info_file = store.info_file("p1");
    for _ in 0..200 {
        if info_file.exists() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let result = fx.coordinator.delete("p1").await.unwrap();
    assert_eq!(result.status_code, 202);

    let events = fx.wait_for_events(2).await;
    match events.last() {
        Some(PortalEvent::ProjectDeletion { project_id, status, error, .. }) => {
            assert_eq!(project_id, "p1");
            assert_eq!(*status, DeletionStatus::Success);
            assert_eq!(*error, None);
        }
        other => panic!("expected a projectDeletion event, got {other:?}"),
    }

    assert_eq!(store.load_by_id("p1", true), None);
    assert!(!store.project_dir("p1").exists());
    assert!(!store.cached(&info_file));
    assert!(!fx.status.registered("p1"));
    assert_eq!(fx.handler.deleted(), vec!["p1"]);
}

#[tokio::test]
async fn delete_of_a_queued_build_removes_it_from_the_queue() {
    let fx = fixture();
    fx.coordinator.create(fx.create_req("p1", "docker", "p1")).await.unwrap();
    assert_eq!(fx.coordinator.scheduler().queued_len(), 1);

    fx.coordinator.delete("p1").await.unwrap();
    assert_eq!(fx.coordinator.scheduler().queued_len(), 0);
    assert_eq!(fx.coordinator.scheduler().running_len(), 0);
}

#[tokio::test]
async fn delete_reports_handler_failures_on_the_bus() {
    let fx = fixture_with(FakeHandler::new("docker").with_delete_error("container stuck"));
    fx.coordinator.create(fx.create_req("p1", "docker", "p1")).await.unwrap();

    fx.coordinator.delete("p1").await.unwrap();
    let events = fx.wait_for_events(1).await;
    match events.last() {
        Some(PortalEvent::ProjectDeletion { status, error, .. }) => {
            assert_eq!(*status, DeletionStatus::Failed);
            assert_eq!(error.as_deref(), Some("container stuck"));
        }
        other => panic!("expected a projectDeletion event, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_guards_its_arguments() {
    let fx = fixture();
    assert_eq!(fx.coordinator.delete("").await.unwrap_err().status_code(), 400);
    assert_eq!(fx.coordinator.delete("ghost").await.unwrap_err().status_code(), 404);
}

#[tokio::test]
async fn shutdown_truncates_the_scheduler_and_forgets_projects() {
    let fx = fixture();
    fx.coordinator.create(fx.create_req("p1", "docker", "p1")).await.unwrap();
    fx.coordinator.create(fx.create_req("p2", "docker", "p2")).await.unwrap();

    let result = fx.coordinator.shutdown().await;
    assert_eq!(result.status_code, 202);
    assert_eq!(fx.coordinator.scheduler().queued_len(), 0);
    assert_eq!(fx.coordinator.scheduler().running_len(), 0);
    assert!(!fx.status.registered("p1"));
    assert!(!fx.status.registered("p2"));
}

#[test]
fn image_id_is_deterministic_per_location() {
    let a = image_id("p1", "docker", std::path::Path::new("/ws/p1"));
    let b = image_id("p1", "docker", std::path::Path::new("/ws/p1"));
    let c = image_id("p1", "docker", std::path::Path::new("/ws/p2"));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.starts_with("p1-docker-"));
    // sha1 hex digest
    assert_eq!(a.len(), "p1-docker-".len() + 40);
}
