// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token payload and the principal decoded from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Principal
// =============================================================================

/// The authenticated actor behind a request.
///
/// A principal carries exactly one role id. `0` is a regular user, anything
/// above `0` is admin tier and bypasses ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// User ID.
    pub id: i64,
    /// Role ID.
    #[serde(rename = "roleId")]
    pub role_id: i64,
}

impl Principal {
    /// Creates a new principal.
    pub fn new(id: i64, role_id: i64) -> Self {
        Self { id, role_id }
    }

    /// Returns `true` if the principal is admin tier.
    pub fn is_admin(&self) -> bool {
        self.role_id > 0
    }

    /// Returns `true` if the principal owns the resource of the given owner.
    pub fn owns(&self, owner_id: i64) -> bool {
        self.id == owner_id
    }
}

// =============================================================================
// PrincipalIdClaim
// =============================================================================

/// Payload property that carries the principal id.
///
/// Older clients sign `userId`, newer ones `id`. A deployment picks exactly
/// one; the issuer and the verifier both use it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrincipalIdClaim {
    /// `id`
    #[default]
    #[serde(rename = "id")]
    Id,
    /// `userId`
    #[serde(rename = "userId")]
    UserId,
}

impl PrincipalIdClaim {
    /// Returns the claim name as it appears in the payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalIdClaim::Id => "id",
            PrincipalIdClaim::UserId => "userId",
        }
    }

    /// Parses a claim name. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(PrincipalIdClaim::Id),
            "userId" => Some(PrincipalIdClaim::UserId),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrincipalIdClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Claims
// =============================================================================

/// JWT claims carried by a Docs Cabinet token.
///
/// Payload shape: `{id | userId, roleId, iat, exp}`. Only the id property
/// selected by [`PrincipalIdClaim`] is consulted when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id under the `id` property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Principal id under the `userId` property.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Role id of the principal.
    #[serde(rename = "roleId")]
    pub role_id: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a principal, storing its id under `id_claim`.
    pub fn for_principal(
        principal: Principal,
        id_claim: PrincipalIdClaim,
        issued_at: i64,
        expires_in_secs: i64,
    ) -> Self {
        let (id, user_id) = match id_claim {
            PrincipalIdClaim::Id => (Some(principal.id), None),
            PrincipalIdClaim::UserId => (None, Some(principal.id)),
        };

        Self {
            id,
            user_id,
            role_id: principal.role_id,
            iat: issued_at,
            exp: issued_at.saturating_add(expires_in_secs),
        }
    }

    /// Returns the principal id stored under `id_claim`.
    pub fn principal_id(&self, id_claim: PrincipalIdClaim) -> Option<i64> {
        match id_claim {
            PrincipalIdClaim::Id => self.id,
            PrincipalIdClaim::UserId => self.user_id,
        }
    }

    /// Returns the principal, or `None` if `id_claim` is absent.
    pub fn principal(&self, id_claim: PrincipalIdClaim) -> Option<Principal> {
        self.principal_id(id_claim)
            .map(|id| Principal::new(id, self.role_id))
    }

    /// Returns `true` if the claims have expired at `now`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the issued at time as a DateTime.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
