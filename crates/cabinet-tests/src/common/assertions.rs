// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Response assertions for Docs Cabinet integration tests.

use axum::body::Body;
use axum::http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;

// =============================================================================
// TestResponse
// =============================================================================

/// A buffered response.
#[derive(Debug, Clone)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Parsed JSON body, `Value::Null` when the body is empty or not JSON.
    pub body: Value,
}

impl TestResponse {
    /// Buffers `response`.
    pub async fn from_response(response: Response<Body>) -> Self {
        let (parts, body) = response.into_parts();
        let bytes = body
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        Self {
            status: parts.status,
            headers: parts.headers,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }

    /// Assert the status code.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, but got {} with body {}",
            expected, self.status, self.body
        );
        self
    }

    /// Assert the body equals `expected` exactly.
    pub fn assert_body(&self, expected: Value) -> &Self {
        assert_eq!(self.body, expected, "Unexpected response body");
        self
    }

    /// Assert an error response with the given status and error name.
    pub fn assert_error(&self, status: StatusCode, error: &str) -> &Self {
        self.assert_status(status);
        assert_eq!(
            self.body["error"], error,
            "Expected error {}, but got body {}",
            error, self.body
        );
        self
    }

    /// Assert the 401 body for an absent token.
    pub fn assert_missing_token(&self) -> &Self {
        self.assert_status(StatusCode::UNAUTHORIZED)
            .assert_body(serde_json::json!({ "error": "MissingTokenError" }))
    }

    /// Assert the 401 body for a rejected token.
    pub fn assert_invalid_token(&self) -> &Self {
        self.assert_status(StatusCode::UNAUTHORIZED)
            .assert_body(serde_json::json!({ "error": "InvalidTokenError" }))
    }

    /// Assert the 403 body.
    pub fn assert_forbidden(&self) -> &Self {
        self.assert_error(StatusCode::FORBIDDEN, "ForbiddenOperationError")
            .assert_has_message()
    }

    /// Assert the 400 body for a malformed target id.
    pub fn assert_invalid_target(&self) -> &Self {
        self.assert_error(StatusCode::BAD_REQUEST, "InvalidTargetUserIdError")
            .assert_has_message()
    }

    /// Assert the body carries a non-empty `message`.
    pub fn assert_has_message(&self) -> &Self {
        let message = self.body["message"].as_str().unwrap_or_default();
        assert!(
            !message.is_empty(),
            "Expected a message, but got body {}",
            self.body
        );
        self
    }

    /// Returns the `total` of a list response.
    pub fn total(&self) -> u64 {
        self.body["total"]
            .as_u64()
            .unwrap_or_else(|| panic!("Expected a list response, got {}", self.body))
    }

    /// Returns the ids in the `items` of a list response.
    pub fn item_ids(&self) -> Vec<i64> {
        self.body["items"]
            .as_array()
            .unwrap_or_else(|| panic!("Expected a list response, got {}", self.body))
            .iter()
            .filter_map(|item| item["id"].as_i64())
            .collect()
    }
}
