// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic error kinds shared by the lifecycle entry points.

use thiserror::Error;

/// Errors surfaced by the lifecycle coordinator and its collaborators.
///
/// Kinds are semantic: the RPC front-end maps them to return codes with
/// [`LifecycleError::status_code`].
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Missing or invalid arguments.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Project, file, location, or handler absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// An existing project with a different type or location.
    #[error("project exists: {0}")]
    Conflict(String),

    /// A handler reported failure during create or delete.
    #[error("handler failure: {0}")]
    HandlerFailure(String),

    /// Filesystem error other than `NotFound`.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Fallback.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LifecycleError {
    /// Return-code mapping: 400 malformed/conflict, 404 not-found, 500 internal.
    pub fn status_code(&self) -> u16 {
        match self {
            LifecycleError::BadRequest(_) | LifecycleError::Conflict(_) => 400,
            LifecycleError::NotFound(_) => 404,
            LifecycleError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => 404,
            LifecycleError::HandlerFailure(_)
            | LifecycleError::Io(_)
            | LifecycleError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
