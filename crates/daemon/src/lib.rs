// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw-daemon: project lifecycle and build scheduling for the cw workspace.

pub mod config;
pub mod env;
pub mod events;
pub mod handlers;
pub mod lifecycle;
pub mod logs;
pub mod scheduler;
pub mod settings;
pub mod status;
pub mod store;
pub mod watcher;

pub use config::Config;
pub use events::TracingEventBus;
pub use handlers::DockerHandler;
pub use lifecycle::{
    image_id, AcceptedResult, ActionRequest, ActionResult, Coordinator, CreateRequest,
    CreateResult, LogBundle, LogFileCheck, LogsResult, ShutdownResult,
};
pub use scheduler::{BuildQueueEntry, BuildScheduler};
pub use status::InMemoryStatus;
pub use store::{InfoUpdate, ProjectInfoStore};
pub use watcher::WatcherSupervisor;
