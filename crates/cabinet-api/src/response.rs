// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthContext, Principal};

// =============================================================================
// ListResponse
// =============================================================================

/// Response wrapping a list of items.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Items.
    pub items: Vec<T>,
    /// Number of items.
    pub total: usize,
}

impl<T> ListResponse<T> {
    /// Creates a list response.
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

impl<T: Serialize> IntoResponse for ListResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// =============================================================================
// Health Response
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Version string.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// =============================================================================
// Principal Response
// =============================================================================

/// The caller's own identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    /// Verified principal.
    #[serde(flatten)]
    pub principal: Principal,
    /// Whether the principal is admin tier.
    pub admin: bool,
    /// Request ID.
    pub request_id: String,
}

impl From<AuthContext> for PrincipalResponse {
    fn from(ctx: AuthContext) -> Self {
        Self {
            principal: ctx.principal,
            admin: ctx.is_admin(),
            request_id: ctx.request_id.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
