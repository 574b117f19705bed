// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Directory doubles for observing what the gate lets through.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cabinet_api::{ApiError, ApiResult, Directory, Document, InMemoryDirectory, User};

// =============================================================================
// RecordingDirectory
// =============================================================================

/// Directory that counts every lookup before delegating.
///
/// A denied request must never reach the directory, so a zero count after a
/// refused request shows the gate answered on its own.
#[derive(Debug, Clone)]
pub struct RecordingDirectory {
    inner: InMemoryDirectory,
    calls: Arc<AtomicUsize>,
}

impl RecordingDirectory {
    /// Wraps `inner`.
    pub fn new(inner: InMemoryDirectory) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Directory for RecordingDirectory {
    async fn user(&self, id: i64) -> ApiResult<Option<User>> {
        self.record();
        self.inner.user(id).await
    }

    async fn users(&self) -> ApiResult<Vec<User>> {
        self.record();
        self.inner.users().await
    }

    async fn documents_for(&self, owner_id: i64) -> ApiResult<Vec<Document>> {
        self.record();
        self.inner.documents_for(owner_id).await
    }

    fn name(&self) -> &str {
        "recording"
    }
}

// =============================================================================
// FailingDirectory
// =============================================================================

/// Directory whose every lookup fails.
#[derive(Debug, Clone, Default)]
pub struct FailingDirectory;

#[async_trait]
impl Directory for FailingDirectory {
    async fn user(&self, _id: i64) -> ApiResult<Option<User>> {
        Err(ApiError::internal("directory unavailable"))
    }

    async fn users(&self) -> ApiResult<Vec<User>> {
        Err(ApiError::internal("directory unavailable"))
    }

    async fn documents_for(&self, _owner_id: i64) -> ApiResult<Vec<Document>> {
        Err(ApiError::internal("directory unavailable"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
