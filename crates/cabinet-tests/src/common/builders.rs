// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders
//!
//! Builder for signed tokens, including the malformed ones the gate must
//! reject.

use cabinet_api::{Claims, Principal, PrincipalIdClaim, TokenConfig, TokenVerifier};

use super::fixtures::{DAY_SECS, TEST_NOW, TEST_SECRET};

// =============================================================================
// TokenBuilder
// =============================================================================

/// Builder for creating test tokens.
///
/// # Example
///
/// ```rust,ignore
/// let token = TokenBuilder::new(5, 0)
///     .issued_at(TEST_NOW - 4 * DAY_SECS)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    id: Option<i64>,
    role_id: i64,
    issued_at: i64,
    expires_in: i64,
    id_claim: PrincipalIdClaim,
    secret: String,
}

impl TokenBuilder {
    /// Creates a builder for principal `id` with `role_id`, issued at
    /// [`TEST_NOW`] with a three-day lifetime.
    pub fn new(id: i64, role_id: i64) -> Self {
        Self {
            id: Some(id),
            role_id,
            issued_at: TEST_NOW,
            expires_in: 3 * DAY_SECS,
            id_claim: PrincipalIdClaim::Id,
            secret: TEST_SECRET.to_string(),
        }
    }

    /// Sets the issue time.
    pub fn issued_at(mut self, issued_at: i64) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// Sets the lifetime in seconds.
    pub fn expires_in(mut self, secs: i64) -> Self {
        self.expires_in = secs;
        self
    }

    /// Stores the principal id under `claim`.
    pub fn id_claim(mut self, claim: PrincipalIdClaim) -> Self {
        self.id_claim = claim;
        self
    }

    /// Signs with `secret` instead of the configured one.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Leaves the principal id out of the payload.
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    /// Returns the claims the token will carry.
    pub fn claims(&self) -> Claims {
        let mut claims = Claims::for_principal(
            Principal::new(self.id.unwrap_or_default(), self.role_id),
            self.id_claim,
            self.issued_at,
            self.expires_in,
        );
        if self.id.is_none() {
            claims.id = None;
            claims.user_id = None;
        }
        claims
    }

    /// Signs the token.
    pub fn build(&self) -> String {
        let config = TokenConfig::new(self.secret.clone()).with_principal_id_claim(self.id_claim);
        TokenVerifier::new(config)
            .expect("Test token config should be valid")
            .sign(&self.claims())
            .expect("Test token should sign")
    }
}

/// Flips one character of the signature so verification fails.
pub fn tamper_signature(token: &str) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    if let Some(last) = chars.last_mut() {
        *last = if *last == 'A' { 'B' } else { 'A' };
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let claims = TokenBuilder::new(5, 0).claims();

        assert_eq!(claims.id, Some(5));
        assert_eq!(claims.role_id, 0);
        assert_eq!(claims.exp - claims.iat, 3 * DAY_SECS);
    }

    #[test]
    fn test_builder_without_id() {
        let claims = TokenBuilder::new(5, 0)
            .id_claim(PrincipalIdClaim::UserId)
            .without_id()
            .claims();

        assert!(claims.id.is_none());
        assert!(claims.user_id.is_none());
    }

    #[test]
    fn test_tamper_changes_token() {
        let token = TokenBuilder::new(1, 1).build();
        assert_ne!(tamper_signature(&token), token);
    }
}
