// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! In-process application harness. Requests go through the real router via
//! `tower::ServiceExt::oneshot`; the clock is frozen at [`TEST_NOW`].

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use tower::ServiceExt;

use cabinet_api::{
    ApiConfig, ApiServer, Directory, FixedClock, PrincipalIdClaim, TokenConfig,
    DEFAULT_AUTH_HEADER,
};

use super::assertions::TestResponse;
use super::builders::TokenBuilder;
use super::fixtures::{fixture_directory, TEST_NOW, TEST_SECRET};
use super::mocks::RecordingDirectory;

// =============================================================================
// TestAppConfig
// =============================================================================

/// Configuration for the test application.
#[derive(Debug, Clone)]
pub struct TestAppConfig {
    /// Header carrying the token.
    pub auth_header: String,
    /// Payload property holding the principal id.
    pub id_claim: PrincipalIdClaim,
    /// Token lifetime.
    pub expiration: Duration,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: i64,
}

impl Default for TestAppConfig {
    fn default() -> Self {
        Self {
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            id_claim: PrincipalIdClaim::Id,
            expiration: Duration::from_secs(3 * 24 * 60 * 60),
            leeway_secs: 0,
        }
    }
}

impl TestAppConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header carrying the token.
    pub fn auth_header(mut self, header: impl Into<String>) -> Self {
        self.auth_header = header.into();
        self
    }

    /// Set the payload property holding the principal id.
    pub fn id_claim(mut self, claim: PrincipalIdClaim) -> Self {
        self.id_claim = claim;
        self
    }

    /// Set the token lifetime.
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Set the clock skew tolerance.
    pub fn leeway_secs(mut self, secs: i64) -> Self {
        self.leeway_secs = secs;
        self
    }

    fn api_config(&self) -> ApiConfig {
        let mut token = TokenConfig::new(TEST_SECRET)
            .with_expiration(self.expiration)
            .with_principal_id_claim(self.id_claim);
        token.leeway_secs = self.leeway_secs;

        ApiConfig::default()
            .with_auth_header(self.auth_header.clone())
            .with_token(token)
    }
}

// =============================================================================
// TestApp
// =============================================================================

/// The application under test.
pub struct TestApp {
    config: TestAppConfig,
    router: Router,
    clock: Arc<FixedClock>,
    directory: RecordingDirectory,
}

impl TestApp {
    /// Creates an app over the fixture directory with default settings.
    pub fn new() -> Self {
        Self::with_config(TestAppConfig::default())
    }

    /// Creates an app over the fixture directory.
    pub fn with_config(config: TestAppConfig) -> Self {
        let directory = RecordingDirectory::new(fixture_directory());
        let (router, clock) = build_router(&config, Arc::new(directory.clone()));

        Self {
            config,
            router,
            clock,
            directory,
        }
    }

    /// Creates a router over an arbitrary directory.
    pub fn router_with_directory(directory: Arc<dyn Directory>) -> Router {
        build_router(&TestAppConfig::default(), directory).0
    }

    /// The frozen clock.
    pub fn clock(&self) -> &FixedClock {
        &self.clock
    }

    /// Number of directory lookups performed so far.
    pub fn directory_calls(&self) -> usize {
        self.directory.calls()
    }

    /// A token builder matching this app's id claim.
    pub fn token(&self, id: i64, role_id: i64) -> TokenBuilder {
        TokenBuilder::new(id, role_id).id_claim(self.config.id_claim)
    }

    /// Sends a GET without a token.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(request(Method::GET, path).body(Body::empty()).unwrap())
            .await
    }

    /// Sends a GET carrying `token` in the configured header.
    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        self.get_with_header(path, &self.config.auth_header.clone(), token)
            .await
    }

    /// Sends a GET with an arbitrary header.
    pub async fn get_with_header(&self, path: &str, name: &str, value: &str) -> TestResponse {
        self.send(
            request(Method::GET, path)
                .header(name, value)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Sends a prepared request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        TestResponse::from_response(response).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

fn build_router(
    config: &TestAppConfig,
    directory: Arc<dyn Directory>,
) -> (Router, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(TEST_NOW));
    let server = ApiServer::builder()
        .config(config.api_config())
        .clock(clock.clone())
        .directory(directory)
        .build()
        .expect("Test server should build");

    (server.router(), clock)
}

fn request(method: Method, path: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(path)
}
