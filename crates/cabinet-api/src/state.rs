// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{Clock, TokenVerifier};
use crate::config::ApiConfig;
use crate::directory::{Directory, InMemoryDirectory};
use crate::error::ApiResult;
use crate::middleware::Gate;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token gate.
    pub gate: Gate,
    /// User and document lookups.
    pub directory: Arc<dyn Directory>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token gate.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Returns the token verifier.
    pub fn verifier(&self) -> &TokenVerifier {
        self.gate.verifier()
    }

    /// Returns the directory.
    pub fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    verifier: Option<Arc<TokenVerifier>>,
    clock: Option<Arc<dyn Clock>>,
    directory: Option<Arc<dyn Directory>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token verifier.
    pub fn verifier(mut self, verifier: Arc<TokenVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Sets the time source used for expiry checks.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Sets the directory.
    pub fn directory(mut self, directory: Arc<dyn Directory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Builds the AppState.
    ///
    /// The verifier is created from the token configuration unless one was
    /// supplied. An empty in-memory directory is used if none was set.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let verifier = match self.verifier {
            Some(verifier) => verifier,
            None => Arc::new(TokenVerifier::new(config.token.clone())?),
        };

        let mut gate = Gate::new(verifier).with_header_name(&config.auth_header)?;
        if let Some(clock) = self.clock {
            gate = gate.with_clock(clock);
        }

        let directory = self
            .directory
            .unwrap_or_else(|| Arc::new(InMemoryDirectory::new()));

        Ok(AppState {
            config: Arc::new(config),
            gate,
            directory,
        })
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn Directory> {
    fn from_ref(state: &AppState) -> Self {
        state.directory.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
