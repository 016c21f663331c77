// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `.cw-settings` overrides applied during create.

use super::prelude::*;
use cw_core::test_support::FakeHandler;
use cw_daemon::CreateRequest;

#[tokio::test]
async fn settings_file_wins_over_handler_defaults() {
    let h = harness(3, FakeHandler::new("docker").with_app_ports(&["8080"]));
    let location = h.location("p1");
    std::fs::write(
        location.join(".cw-settings"),
        r#"{"internalPort":"3000","contextRoot":"//api/v1/","mavenProfiles":["dev","","prod"]}"#,
    )
    .expect("settings file");

    let req = CreateRequest {
        project_id: "p1".to_string(),
        project_type: "docker".to_string(),
        location,
        start_mode: None,
        extension_id: None,
    };
    h.coordinator.create(req).await.expect("create");

    let info = h.coordinator.store().load_by_id("p1", false).expect("info");
    assert_eq!(info.app_ports, vec!["3000"]);
    assert_eq!(info.context_root.as_deref(), Some("/api/v1"));
    // The half-empty maven setting is rejected whole
    assert_eq!(info.maven_profiles, None);
}

#[tokio::test]
async fn numeric_ports_and_padded_context_roots_are_normalised() {
    let h = harness(3, FakeHandler::new("docker"));
    let location = h.location("p1");
    std::fs::write(
        location.join(".cw-settings"),
        r#"{"internalPort":3000,"contextRoot":" //foo// ","internalDebugPort":9229}"#,
    )
    .expect("settings file");

    let req = CreateRequest {
        project_id: "p1".to_string(),
        project_type: "docker".to_string(),
        location,
        start_mode: None,
        extension_id: None,
    };
    h.coordinator.create(req).await.expect("create");

    let info = h.coordinator.store().load_by_id("p1", false).expect("info");
    assert_eq!(info.app_ports, vec!["3000"]);
    assert_eq!(info.context_root.as_deref(), Some("/foo"));
    assert_eq!(info.debug_port.as_deref(), Some("9229"));
}
