// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization module.
//!
//! This module provides:
//! - Token issuing and verification
//! - Role-based access decisions
//! - Time sources for expiry checks
//! - Authentication context

mod claims;
mod clock;
mod context;
pub mod policy;
mod token;

pub use claims::{Claims, Principal, PrincipalIdClaim};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::AuthContext;
pub use policy::{AccessRule, Decision, Denial};
pub use token::{TokenConfig, TokenRejection, TokenVerifier, DEFAULT_TOKEN_EXPIRATION_SECS};

/// Signing algorithm accepted by [`TokenConfig`].
pub use jsonwebtoken::Algorithm;
