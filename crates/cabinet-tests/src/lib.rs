// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Docs Cabinet Integration Tests
//!
//! Integration tests for the Docs Cabinet access gate, driven over the full
//! router with a frozen clock.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities, fixtures, and helpers
//!   - `fixtures`: Seed users, documents, secrets and config files
//!   - `builders`: Token builder for well-formed and malformed tokens
//!   - `assertions`: Response assertions
//!   - `mocks`: Directory doubles
//!   - `harness`: In-process application harness
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p cabinet-tests
//!
//! # Run specific test suite
//! cargo test -p cabinet-tests --test integration_gate
//! cargo test -p cabinet-tests --test integration_api
//! cargo test -p cabinet-tests --test integration_config
//! ```
//!
//! ## Using the Harness
//!
//! ```rust,ignore
//! use cabinet_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let token = app.token(5, 0).build();
//!
//!     app.get_with_token("/api/users/5/documents", &token)
//!         .await
//!         .assert_status(StatusCode::OK);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use axum::http::StatusCode;
    pub use cabinet_api::DEFAULT_AUTH_HEADER;
}
