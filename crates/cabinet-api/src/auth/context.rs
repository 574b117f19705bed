// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccessRule, Principal};

/// Authentication context for a request.
///
/// Attached to the request extensions by the gate once a request is allowed.
/// It lives only as long as the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Verified principal.
    pub principal: Principal,
    /// Rule the request was admitted under.
    pub rule: AccessRule,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl AuthContext {
    /// Creates a context for a principal admitted under `rule`.
    pub fn new(principal: Principal, rule: AccessRule) -> Self {
        Self {
            principal,
            rule,
            request_id: Uuid::now_v7(),
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the principal id.
    pub fn user_id(&self) -> i64 {
        self.principal.id
    }

    /// Returns `true` if the principal is admin tier.
    pub fn is_admin(&self) -> bool {
        self.principal.is_admin()
    }
}
