// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuing and verification.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Claims, Principal, PrincipalIdClaim};
use crate::error::{ApiError, ApiResult};

/// Token lifetime of the reference deployment (3 days).
pub const DEFAULT_TOKEN_EXPIRATION_SECS: i64 = 3 * 24 * 60 * 60;

// =============================================================================
// TokenRejection
// =============================================================================

/// Reason a token was not accepted.
///
/// Signature, payload and expiry failures all collapse into `Invalid` so that
/// callers never learn which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    /// No token was presented.
    #[error("no token provided")]
    Missing,
    /// The token failed verification.
    #[error("token is invalid")]
    Invalid,
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Shared signing secret.
    #[serde(skip_serializing)]
    pub secret: String,
    /// HMAC algorithm used for signing.
    #[serde(with = "algorithm_serde")]
    pub algorithm: Algorithm,
    /// Token lifetime in seconds.
    pub expiration_secs: i64,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: i64,
    /// Payload property holding the principal id.
    pub principal_id_claim: PrincipalIdClaim,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by user
            algorithm: Algorithm::HS256,
            expiration_secs: DEFAULT_TOKEN_EXPIRATION_SECS,
            leeway_secs: 0,
            principal_id_claim: PrincipalIdClaim::Id,
        }
    }
}

impl TokenConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the token lifetime.
    pub fn with_expiration(mut self, duration: Duration) -> Self {
        self.expiration_secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        self
    }

    /// Sets the payload property holding the principal id.
    pub fn with_principal_id_claim(mut self, claim: PrincipalIdClaim) -> Self {
        self.principal_id_claim = claim;
        self
    }

    /// Sets the signing algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::internal("token secret is not configured"));
        }
        if !is_hmac(self.algorithm) {
            return Err(ApiError::internal(format!(
                "algorithm {:?} cannot be used with a shared secret",
                self.algorithm
            )));
        }
        if self.expiration_secs <= 0 {
            return Err(ApiError::internal("token expiration must be positive"));
        }
        if self.leeway_secs < 0 {
            return Err(ApiError::internal("token leeway cannot be negative"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("Token secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

// =============================================================================
// TokenVerifier
// =============================================================================

/// Issues and verifies signed tokens.
///
/// Verification is a pure computation over the token, the configured secret
/// and the caller-supplied `now`; the verifier never reads the wall clock.
#[derive(Clone)]
pub struct TokenVerifier {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenVerifier {
    /// Creates a new verifier with the given configuration.
    pub fn new(config: TokenConfig) -> ApiResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry is checked against the caller's clock in `verify`.
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Signs the given claims.
    pub fn sign(&self, claims: &Claims) -> ApiResult<String> {
        let header = Header::new(self.config.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to create token: {}", e)))
    }

    /// Issues a token for `principal` valid from `now` for the configured lifetime.
    pub fn issue(&self, principal: Principal, now: i64) -> ApiResult<String> {
        self.issue_with_expiration(principal, now, self.config.expiration_secs)
    }

    /// Issues a token for `principal` with an explicit lifetime.
    pub fn issue_with_expiration(
        &self,
        principal: Principal,
        now: i64,
        expires_in_secs: i64,
    ) -> ApiResult<String> {
        let claims = Claims::for_principal(
            principal,
            self.config.principal_id_claim,
            now,
            expires_in_secs,
        );
        self.sign(&claims)
    }

    /// Verifies a token and returns its claims.
    pub fn decode(&self, token: &str, now: i64) -> Result<Claims, TokenRejection> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenRejection::Invalid)?;

        if claims.is_expired_at(now.saturating_sub(self.config.leeway_secs)) {
            return Err(TokenRejection::Invalid);
        }

        Ok(claims)
    }

    /// Verifies a token and returns the principal it encodes.
    ///
    /// An absent or blank token is `Missing`; every other failure is `Invalid`.
    pub fn verify(&self, token: Option<&str>, now: i64) -> Result<Principal, TokenRejection> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(TokenRejection::Missing),
        };

        self.decode(token, now)?
            .principal(self.config.principal_id_claim)
            .ok_or(TokenRejection::Invalid)
    }

    /// Returns the configured token lifetime in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.config.expiration_secs
    }

    /// Returns the payload property holding the principal id.
    pub fn principal_id_claim(&self) -> PrincipalIdClaim {
        self.config.principal_id_claim
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &self.config.algorithm)
            .field("expiration_secs", &self.config.expiration_secs)
            .field("principal_id_claim", &self.config.principal_id_claim)
            .finish()
    }
}

// =============================================================================
// Algorithm Serialization
// =============================================================================

mod algorithm_serde {
    use jsonwebtoken::Algorithm;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(algorithm: &Algorithm, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match algorithm {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "Unsupported algorithm: {:?}",
                    other
                )))
            }
        };
        s.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Algorithm, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            _ => Err(serde::de::Error::custom(format!(
                "Unsupported algorithm: {}",
                s
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
