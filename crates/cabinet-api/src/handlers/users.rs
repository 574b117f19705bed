// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User handlers.
//!
//! Access rules are enforced by the gate before these run.

use axum::{extract::State, response::IntoResponse, Json};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, OwnerIdPath};
use crate::response::{ListResponse, PrincipalResponse};
use crate::state::AppState;

// =============================================================================
// List Users
// =============================================================================

/// GET /api/users
///
/// Lists all users. Admin tier only.
pub async fn list_users(
    State(state): State<AppState>,
    Auth(auth_ctx): Auth,
) -> ApiResult<impl IntoResponse> {
    let users = state.directory().users().await?;

    tracing::debug!(
        request_id = %auth_ctx.request_id,
        count = users.len(),
        "Listed users"
    );

    Ok(ListResponse::new(users))
}

// =============================================================================
// Get User
// =============================================================================

/// GET /api/users/{id}
///
/// Returns one user. Owner or admin tier.
pub async fn get_user(
    State(state): State<AppState>,
    Auth(auth_ctx): Auth,
    OwnerIdPath(user_id): OwnerIdPath,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .directory()
        .user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("user {}", user_id)))?;

    tracing::debug!(
        request_id = %auth_ctx.request_id,
        user_id = user.id,
        "Fetched user"
    );

    Ok(Json(user))
}

// =============================================================================
// Current Principal
// =============================================================================

/// GET /api/me
///
/// Echoes the verified principal.
pub async fn me(Auth(auth_ctx): Auth) -> impl IntoResponse {
    Json(PrincipalResponse::from(auth_ctx))
}
