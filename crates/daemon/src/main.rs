// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! cwd: the cw workspace daemon binary.

use std::io::Write;
use std::sync::Arc;

use cw_core::{EnglishCatalog, StaticRegistry};
use fs2::FileExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cw_daemon::{Config, Coordinator, DockerHandler, InMemoryStatus, TracingEventBus};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("cwd: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(&config.daemon_log_dir)?;

    let appender = tracing_appender::rolling::daily(&config.daemon_log_dir, "cwd.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CW_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    // Exclusive pid-file lock: exactly one daemon per data directory.
    let mut lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&config.lock_path)?;
    if lock_file.try_lock_exclusive().is_err() {
        return Err(format!(
            "another cwd instance holds {}",
            config.lock_path.display()
        )
        .into());
    }
    write!(lock_file, "{}", std::process::id())?;

    let status = Arc::new(InMemoryStatus::new());
    let mut registry = StaticRegistry::new();
    registry.register(Arc::new(DockerHandler::new(status.clone())));

    let coordinator = Coordinator::new(
        config,
        Arc::new(registry),
        status,
        Arc::new(TracingEventBus),
        Arc::new(EnglishCatalog),
    );

    let scheduler = coordinator.scheduler();
    let tick_loop = tokio::spawn(scheduler.run());

    info!(pid = std::process::id(), "cwd ready");
    tokio::signal::ctrl_c().await?;

    info!("shutdown requested");
    coordinator.shutdown().await;
    tick_loop.abort();
    Ok(())
}
