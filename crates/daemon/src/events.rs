// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default event bus: logs emissions until a socket front-end attaches.

use cw_core::{EventBus, PortalEvent};
use tracing::{info, warn};

/// Emits portal events into the daemon log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventBus;

impl EventBus for TracingEventBus {
    fn emit(&self, event: PortalEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => info!(event = %json, "portal event"),
            Err(e) => warn!(error = %e, "failed to serialize portal event"),
        }
    }
}
