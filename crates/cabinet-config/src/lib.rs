// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # cabinet-config
//!
//! Configuration management for the Docs Cabinet server.
//!
//! ## Features
//!
//! - **Schema Definition**: Server, security, logging and directory seed sections
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: Override config values via environment variables
//! - **Masked Secrets**: The signing secret never appears in debug output
//!
//! ## Quick Start
//!
//! ```no_run
//! use cabinet_config::loader::load_config;
//!
//! let config = load_config("cabinet.yaml").unwrap();
//!
//! println!("Listening on {}", config.server.socket_addr());
//! println!("Seeded users: {}", config.directory.users.len());
//! ```
//!
//! ## Configuration Schema
//!
//! - `server` - Bind address and request timeout
//! - `security` - Signing secret, algorithm, token lifetime and header name
//! - `logging` - Log level and format
//! - `directory` - Users and documents served by the in-memory directory
//!
//! ## Environment Variables
//!
//! ```text
//! DOCS_CABINET_SECRET=change-me
//! DOCS_CABINET_PORT=9090
//! DOCS_CABINET_LOG_LEVEL=debug
//! ```
//!
//! Values in config files can reference environment variables:
//!
//! ```yaml
//! security:
//!   secret: "${SECRET}"
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use schema::{
    // Top-level config
    CabinetConfig,
    ServerConfig,
    // Security config
    SecurityConfig,
    TokenAlgorithm,
    IdClaim,
    SecretValue,
    // Logging config
    LoggingConfig,
    LogLevel,
    LogFormat,
    // Directory seeds
    DirectoryConfig,
    UserSeed,
    DocumentSeed,
    DocumentAccess,
};

pub use loader::{
    load_config, ConfigFormat, ConfigLoader, ConfigLoaderBuilder, DEFAULT_ENV_PREFIX,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// =============================================================================
// Prelude
// =============================================================================

/// Convenience re-exports for common use cases.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::loader::{load_config, ConfigLoader};
    pub use crate::schema::{CabinetConfig, DirectoryConfig, SecretValue, SecurityConfig};
}

// =============================================================================
// Tests
// =============================================================================
