// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Document handlers.

use axum::{extract::State, response::IntoResponse};

use crate::error::ApiResult;
use crate::extractors::{Auth, OwnerIdPath};
use crate::response::ListResponse;
use crate::state::AppState;

/// GET /api/users/{id}/documents
///
/// Lists the documents owned by a user. Owner or admin tier.
pub async fn list_documents(
    State(state): State<AppState>,
    Auth(auth_ctx): Auth,
    OwnerIdPath(owner_id): OwnerIdPath,
) -> ApiResult<impl IntoResponse> {
    let documents = state.directory().documents_for(owner_id).await?;

    tracing::debug!(
        request_id = %auth_ctx.request_id,
        owner_id,
        count = documents.len(),
        "Listed documents"
    );

    Ok(ListResponse::new(documents))
}
