// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::auth::policy::{parse_owner_id, MALFORMED_TARGET_MESSAGE};
use crate::auth::AuthContext;
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for requests admitted by the gate.
///
/// Extracts the `AuthContext` from the request extensions. A route mounted
/// without the gate has none, which is answered as a missing token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(ctx): Auth) -> impl IntoResponse {
///     format!("Hello, {}", ctx.user_id())
/// }
/// ```
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .map(Auth)
            .ok_or(ApiError::MissingToken)
    }
}

// =============================================================================
// Owner ID Extractor
// =============================================================================

/// Extractor for the owner id addressed by the first path parameter.
pub struct OwnerIdPath(pub i64);

impl<S> FromRequestParts<S> for OwnerIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid path: {}", e)))?;

        parse_owner_id(&segment)
            .map(OwnerIdPath)
            .ok_or_else(|| ApiError::invalid_target_user_id(MALFORMED_TARGET_MESSAGE))
    }
}

// =============================================================================
// Tests
// =============================================================================
