// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-based access decisions over a verified principal.
//!
//! Every decision is a pure function of the principal and the addressed
//! target. Nothing is cached between requests.

use serde::{Deserialize, Serialize};

use super::{Principal, TokenRejection};

/// Reason given to a principal denied by an access rule.
pub const FORBIDDEN_MESSAGE: &str = "not permitted to perform this action";

/// Reason given when the addressed owner id is not an integer.
pub const MALFORMED_TARGET_MESSAGE: &str = "target user id must be an integer";

// =============================================================================
// Decision
// =============================================================================

/// Why a request is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No token was presented.
    MissingToken,
    /// The token failed verification.
    InvalidToken,
    /// The principal may not perform the operation.
    Forbidden(String),
    /// The addressed owner id is not an integer.
    MalformedTarget,
}

impl Denial {
    /// Creates a forbidden denial with the standard reason.
    pub fn forbidden() -> Self {
        Denial::Forbidden(FORBIDDEN_MESSAGE.to_string())
    }
}

impl From<TokenRejection> for Denial {
    fn from(rejection: TokenRejection) -> Self {
        match rejection {
            TokenRejection::Missing => Denial::MissingToken,
            TokenRejection::Invalid => Denial::InvalidToken,
        }
    }
}

/// Outcome of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The request may proceed.
    Allow,
    /// The request is refused.
    Deny(Denial),
}

impl Decision {
    /// Returns `true` if the request may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Returns the denial, if any.
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Decision::Allow => None,
            Decision::Deny(denial) => Some(denial),
        }
    }
}

impl From<Denial> for Decision {
    fn from(denial: Denial) -> Self {
        Decision::Deny(denial)
    }
}

// =============================================================================
// Rules
// =============================================================================

/// Allows admin-tier principals only.
pub fn decide_admin_only(principal: &Principal) -> Decision {
    if principal.is_admin() {
        Decision::Allow
    } else {
        Decision::Deny(Denial::forbidden())
    }
}

/// Allows admin-tier principals and the owner of the addressed resource.
///
/// The target must parse as an owner id before ownership is considered, so a
/// malformed target is refused even for admins.
pub fn decide_owner_or_admin(principal: &Principal, target: Option<&str>) -> Decision {
    let owner_id = match target.and_then(parse_owner_id) {
        Some(owner_id) => owner_id,
        None => return Decision::Deny(Denial::MalformedTarget),
    };

    if principal.is_admin() || principal.owns(owner_id) {
        Decision::Allow
    } else {
        Decision::Deny(Denial::forbidden())
    }
}

/// Parses an owner id from a path segment.
///
/// Accepts an optional leading `-` followed by ASCII digits that fit in an
/// `i64`. Whitespace, `+`, decimals and exponents are rejected.
pub fn parse_owner_id(segment: &str) -> Option<i64> {
    let digits = segment.strip_prefix('-').unwrap_or(segment);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

// =============================================================================
// AccessRule
// =============================================================================

/// Rule a route is guarded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRule {
    /// Any verified principal.
    Authenticated,
    /// Admin-tier principals only.
    AdminOnly,
    /// The addressed owner or an admin-tier principal.
    OwnerOrAdmin,
}

impl AccessRule {
    /// Evaluates the rule for a verified principal.
    pub fn decide(&self, principal: &Principal, target: Option<&str>) -> Decision {
        match self {
            AccessRule::Authenticated => Decision::Allow,
            AccessRule::AdminOnly => decide_admin_only(principal),
            AccessRule::OwnerOrAdmin => decide_owner_or_admin(principal, target),
        }
    }

    /// Returns the rule name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessRule::Authenticated => "authenticated",
            AccessRule::AdminOnly => "admin_only",
            AccessRule::OwnerOrAdmin => "owner_or_admin",
        }
    }
}

impl std::fmt::Display for AccessRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
