// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded admission and queue-rank behavior under a small concurrency cap.

use super::prelude::*;
use cw_core::test_support::FakeHandler;
use cw_core::{BuildState, DeletionStatus, PortalEvent, StatusController};

#[tokio::test]
async fn four_creates_under_a_cap_of_two_drain_in_fifo_order() {
    let h = harness(2, FakeHandler::new("docker"));
    for id in ["p1", "p2", "p3", "p4"] {
        h.create(id).await;
    }

    let scheduler = h.coordinator.scheduler();
    scheduler.tick().await;

    assert_eq!(scheduler.running_len(), 2);
    assert_eq!(scheduler.queued_len(), 2);
    assert_eq!(h.status.build_state("p1"), Some(BuildState::InProgress));
    assert_eq!(h.status.build_state("p2"), Some(BuildState::InProgress));
    assert!(h.status.message("p3").unwrap_or_default().contains("1/2"));
    assert!(h.status.message("p4").unwrap_or_default().contains("2/2"));

    // p1 finishing frees a slot for p3 on the next tick
    h.status.update_build_state("p1", BuildState::Success, "test", None);
    scheduler.tick().await;

    assert_eq!(scheduler.running_len(), 2);
    assert_eq!(h.status.build_state("p3"), Some(BuildState::InProgress));
    assert_eq!(scheduler.queued_len(), 1);
    assert!(h.status.message("p4").unwrap_or_default().contains("1/1"));
}

#[tokio::test]
async fn deleting_a_queued_project_empties_its_rank() {
    let h = harness(2, FakeHandler::new("docker"));
    for id in ["p1", "p2", "p3", "p4"] {
        h.create(id).await;
    }
    let scheduler = h.coordinator.scheduler();
    scheduler.tick().await;
    assert_eq!(scheduler.queued_len(), 2);

    let result = h.coordinator.delete("p4").await.expect("delete");
    assert_eq!(result.status_code, 202);
    assert_eq!(scheduler.queued_len(), 1);
    assert!(h.status.message("p3").unwrap_or_default().contains("1/1"));

    let event = h
        .wait_for_event(|e| matches!(e, PortalEvent::ProjectDeletion { project_id, .. } if project_id == "p4"))
        .await;
    match event {
        PortalEvent::ProjectDeletion { status, .. } => assert_eq!(status, DeletionStatus::Success),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn a_project_is_never_queued_twice() {
    let h = harness(1, FakeHandler::new("docker"));
    h.create("p1").await;
    h.create("p2").await;
    let scheduler = h.coordinator.scheduler();
    assert_eq!(scheduler.queued_len(), 2);

    // Re-creation of a queued project does not duplicate its entry
    h.create("p2").await;
    assert_eq!(scheduler.queued_len(), 2);
}
