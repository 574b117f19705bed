// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # cabinet-api
//!
//! REST API server for Docs Cabinet.
//!
//! This crate verifies tokens, applies role-based access rules and serves
//! the user and document routes behind a request gate.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{
    AccessRule, Algorithm, AuthContext, Claims, Clock, Decision, Denial, FixedClock, Principal,
    PrincipalIdClaim, SystemClock, TokenConfig, TokenRejection, TokenVerifier,
};
pub use config::ApiConfig;
pub use directory::{Access, Directory, Document, InMemoryDirectory, User};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use middleware::{Gate, GateLayer, GateOutcome, DEFAULT_AUTH_HEADER};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
