// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! Every error maps to exactly one HTTP status and one JSON body of the form
//! `{"message": "...", "error": "<Name>"}`. Token failures carry no message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::policy::MALFORMED_TARGET_MESSAGE;
use crate::auth::{Denial, TokenRejection};

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No token was presented (401).
    #[error("missing token")]
    MissingToken,

    /// The token failed verification (401).
    #[error("invalid token")]
    InvalidToken,

    /// The addressed user id is not an integer (400).
    #[error("invalid target user id: {message}")]
    InvalidTargetUserId {
        /// Error message.
        message: String,
    },

    /// The principal may not perform the operation (403).
    #[error("forbidden: {message}")]
    ForbiddenOperation {
        /// Error message.
        message: String,
    },

    /// Resource not found (404).
    #[error("resource not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// Bad request (400).
    #[error("bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (500).
    #[error("internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },
}

impl ApiError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates an invalid target user id error.
    pub fn invalid_target_user_id(message: impl Into<String>) -> Self {
        Self::InvalidTargetUserId {
            message: message.into(),
        }
    }

    /// Creates a forbidden operation error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::ForbiddenOperation {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::InvalidTargetUserId { .. } | ApiError::BadRequest { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ForbiddenOperation { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error name carried in the `error` property of the body.
    pub fn error_name(&self) -> &'static str {
        match self {
            ApiError::MissingToken => "MissingTokenError",
            ApiError::InvalidToken => "InvalidTokenError",
            ApiError::InvalidTargetUserId { .. } => "InvalidTargetUserIdError",
            ApiError::ForbiddenOperation { .. } => "ForbiddenOperationError",
            ApiError::NotFound { .. } => "NotFoundError",
            ApiError::BadRequest { .. } => "BadRequestError",
            ApiError::Internal { .. } => "InternalServerError",
        }
    }

    /// Returns the message shown to clients, if any.
    ///
    /// Internal details never reach the client.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ApiError::MissingToken | ApiError::InvalidToken => None,
            ApiError::InvalidTargetUserId { message }
            | ApiError::ForbiddenOperation { message }
            | ApiError::BadRequest { message } => Some(message.clone()),
            ApiError::NotFound { resource } => Some(format!("{} not found", resource)),
            ApiError::Internal { .. } => Some("internal server error".to_string()),
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Internal { .. })
    }

    /// Returns the response body for this error.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.user_message(),
            error: self.error_name().to_string(),
        }
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(
                error = %self,
                error_name = self.error_name(),
                "Server error occurred"
            );
        }

        (self.status_code(), Json(self.body())).into_response()
    }
}

// =============================================================================
// Error Response Body
// =============================================================================

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error name for programmatic handling.
    pub error: String,
}

// =============================================================================
// From Implementations
// =============================================================================

impl From<TokenRejection> for ApiError {
    fn from(rejection: TokenRejection) -> Self {
        Denial::from(rejection).into()
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::MissingToken => ApiError::MissingToken,
            Denial::InvalidToken => ApiError::InvalidToken,
            Denial::Forbidden(message) => ApiError::ForbiddenOperation { message },
            Denial::MalformedTarget => ApiError::invalid_target_user_id(MALFORMED_TARGET_MESSAGE),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::internal(format!("IO error: {}", err))
    }
}

// =============================================================================
// Tests
// =============================================================================
