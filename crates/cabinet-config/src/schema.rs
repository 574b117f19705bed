// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for Docs Cabinet.
//!
//! # Schema Structure
//!
//! ```text
//! CabinetConfig
//! ├── server: ServerConfig
//! ├── security: SecurityConfig
//! ├── logging: LoggingConfig
//! └── directory: DirectoryConfig
//! ```

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default token lifetime in seconds (3 days).
pub const DEFAULT_TOKEN_EXPIRATION_SECS: u64 = 3 * 24 * 60 * 60;

/// Default header carrying the token.
pub const DEFAULT_AUTH_HEADER: &str = "x-docs-cabinet-authentication";

/// Recommended minimum secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for Docs Cabinet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CabinetConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token and gate configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seed records for the in-memory directory.
    #[serde(default)]
    pub directory: DirectoryConfig,
}

impl CabinetConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.security.validate()?;
        self.logging.validate()?;
        self.directory.validate()?;
        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ServerConfig {
    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "cannot be zero"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                "cannot be zero",
            ));
        }
        Ok(())
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Security Configuration
// =============================================================================

/// Token and gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// Shared signing secret.
    #[serde(default)]
    pub secret: Option<SecretValue>,

    /// Signing algorithm.
    #[serde(default)]
    pub algorithm: TokenAlgorithm,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_expiration")]
    pub token_expiration_secs: u64,

    /// Clock skew tolerance in seconds.
    #[serde(default)]
    pub leeway_secs: u64,

    /// Header carrying the token.
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Payload property holding the principal id.
    #[serde(default)]
    pub principal_id_claim: IdClaim,
}

fn default_token_expiration() -> u64 {
    DEFAULT_TOKEN_EXPIRATION_SECS
}

fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_string()
}

impl SecurityConfig {
    /// Validates the security configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.secret {
            Some(ref secret) if !secret.is_empty() => {
                if secret.len() < MIN_SECRET_LENGTH {
                    tracing::warn!(
                        "security.secret is shorter than recommended ({} bytes)",
                        MIN_SECRET_LENGTH
                    );
                }
            }
            _ => {
                return Err(ConfigError::missing_field("security.secret"));
            }
        }
        if self.token_expiration_secs == 0 {
            return Err(ConfigError::validation(
                "security.token_expiration_secs",
                "cannot be zero",
            ));
        }
        if i64::try_from(self.token_expiration_secs).is_err() {
            return Err(ConfigError::validation(
                "security.token_expiration_secs",
                "value too large",
            ));
        }
        if !is_header_name(&self.auth_header) {
            return Err(ConfigError::validation(
                "security.auth_header",
                format!("'{}' is not a lowercase HTTP header name", self.auth_header),
            ));
        }
        Ok(())
    }

    /// Returns the token lifetime as a Duration.
    pub fn token_expiration(&self) -> Duration {
        Duration::from_secs(self.token_expiration_secs)
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret: None,
            algorithm: TokenAlgorithm::default(),
            token_expiration_secs: DEFAULT_TOKEN_EXPIRATION_SECS,
            leeway_secs: 0,
            auth_header: default_auth_header(),
            principal_id_claim: IdClaim::default(),
        }
    }
}

/// Returns `true` if `name` is a lowercase RFC 7230 token.
fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_lowercase() || b.is_ascii_digit() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

/// Token signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenAlgorithm {
    /// HMAC using SHA-256.
    #[default]
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
}

impl TokenAlgorithm {
    /// Returns the algorithm name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenAlgorithm::HS256 => "HS256",
            TokenAlgorithm::HS384 => "HS384",
            TokenAlgorithm::HS512 => "HS512",
        }
    }
}

/// Payload property holding the principal id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdClaim {
    /// `id`
    #[default]
    #[serde(rename = "id")]
    Id,
    /// `userId`
    #[serde(rename = "userId")]
    UserId,
}

impl IdClaim {
    /// Returns the property name.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdClaim::Id => "id",
            IdClaim::UserId => "userId",
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON for log aggregation.
    Json,
    /// Compact single-line text.
    Compact,
}

// =============================================================================
// Directory Configuration
// =============================================================================

/// Seed records for the in-memory directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectoryConfig {
    /// Users.
    #[serde(default)]
    pub users: Vec<UserSeed>,

    /// Documents.
    #[serde(default)]
    pub documents: Vec<DocumentSeed>,
}

impl DirectoryConfig {
    /// Validates the directory seeds.
    ///
    /// User and document ids must be unique and every document owner must be
    /// a seeded user.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut user_ids = HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id) {
                return Err(ConfigError::duplicate_id("user", user.id));
            }
            if user.role_id < 0 {
                return Err(ConfigError::validation(
                    format!("directory.users[{}].role_id", user.id),
                    "cannot be negative",
                ));
            }
        }

        let mut document_ids = HashSet::new();
        for document in &self.documents {
            if !document_ids.insert(document.id) {
                return Err(ConfigError::duplicate_id("document", document.id));
            }
            if !user_ids.contains(&document.owner_id) {
                return Err(ConfigError::validation(
                    format!("directory.documents[{}].owner_id", document.id),
                    format!("unknown user {}", document.owner_id),
                ));
            }
        }
        Ok(())
    }
}

/// A seeded user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserSeed {
    /// User ID.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Role ID (`0` regular, `>= 1` admin tier).
    #[serde(default, alias = "roleId")]
    pub role_id: i64,
}

/// A seeded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSeed {
    /// Document ID.
    pub id: i64,
    /// Owning user ID.
    #[serde(alias = "ownerId")]
    pub owner_id: i64,
    /// Title.
    pub title: String,
    /// Visibility.
    #[serde(default)]
    pub access: DocumentAccess,
}

/// Visibility of a seeded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentAccess {
    /// Visible to everyone.
    Public,
    /// Visible to the owner.
    #[default]
    Private,
    /// Visible to principals of the owner's role.
    Role,
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret that is never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretValue(***)")
    }
}
