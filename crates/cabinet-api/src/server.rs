// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::auth::{AccessRule, Clock, TokenVerifier};
use crate::config::ApiConfig;
use crate::directory::Directory;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::state::{AppState, AppStateBuilder};

/// Path prefix of the user routes. The gate reads the target id after it.
pub const USERS_MOUNT: &str = "/api/users";

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates a server builder.
    pub fn builder() -> ApiServerBuilder {
        ApiServerBuilder::new()
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let gate = self.state.gate();
        let users_gate = gate.clone().with_mount(USERS_MOUNT);

        let admin_routes: Router<AppState> = Router::new()
            .route(USERS_MOUNT, get(handlers::list_users))
            .route_layer(users_gate.layer(AccessRule::AdminOnly));

        let owner_routes: Router<AppState> = Router::new()
            .route("/api/users/{id}", get(handlers::get_user))
            .route("/api/users/{id}/documents", get(handlers::list_documents))
            .route_layer(users_gate.layer(AccessRule::OwnerOrAdmin));

        let identity_routes: Router<AppState> = Router::new()
            .route("/api/me", get(handlers::me))
            .route_layer(gate.layer(AccessRule::Authenticated));

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(create_cors_layer(&self.state));

        Router::new()
            // Health endpoint (public)
            .route("/health", get(handlers::health))
            .merge(admin_routes)
            .merge(owner_routes)
            .merge(identity_routes)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer. The token header must be allowed for browsers to
/// send it cross-origin.
fn create_cors_layer(state: &AppState) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            state.gate().header().clone(),
        ])
        .max_age(Duration::from_secs(3600))
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
#[derive(Default)]
pub struct ApiServerBuilder {
    state_builder: AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the token verifier.
    pub fn verifier(mut self, verifier: Arc<TokenVerifier>) -> Self {
        self.state_builder = self.state_builder.verifier(verifier);
        self
    }

    /// Sets the time source used for expiry checks.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.state_builder = self.state_builder.clock(clock);
        self
    }

    /// Sets the directory.
    pub fn directory(mut self, directory: Arc<dyn Directory>) -> Self {
        self.state_builder = self.state_builder.directory(directory);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::TokenConfig;

    fn test_config() -> ApiConfig {
        ApiConfig::default().with_token(TokenConfig::new("test-secret-key-that-is-long-enough"))
    }

    #[test]
    fn test_server_builder() {
        let server = ApiServerBuilder::new().config(test_config()).build().unwrap();

        assert_eq!(server.addr().port(), 8080);
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let server = ApiServer::builder().config(test_config()).build().unwrap();

        let res = server
            .router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_guarded_route_without_token() {
        let server = ApiServer::builder().config(test_config()).build().unwrap();

        let res = server
            .router()
            .oneshot(Request::builder().uri("/api/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
