// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # cabinet-bin
//!
//! CLI binary for the Docs Cabinet server.
//!
//! This crate provides the `docs-cabinet` entry point, including:
//!
//! - CLI argument parsing with clap
//! - Server runtime orchestration
//! - Graceful shutdown handling
//! - Logging initialization
//! - Command implementations (serve, validate, issue-token, verify-token, version)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         main.rs                              │
//! │                    (Entry Point)                             │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                    ┌──────▼──────┐
//!                    │    cli.rs   │
//!                    │ (Argument   │
//!                    │  Parsing)   │
//!                    └──────┬──────┘
//!                           │
//!               ┌───────────┼───────────┐
//!               ▼           ▼           ▼
//!        ┌──────────┐ ┌──────────┐ ┌──────────┐
//!        │ commands │ │ runtime  │ │ logging  │
//!        └──────────┘ └──────────┘ └──────────┘
//!               │           │
//!               │    ┌──────▼──────┐
//!               │    │  shutdown   │
//!               │    └─────────────┘
//!               │
//!        ┌──────┴──────┐
//!        │  cabinet-*  │
//!        │  (crates)   │
//!        └─────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! docs-cabinet
//!
//! # Start with custom config
//! docs-cabinet -c /etc/docs-cabinet/cabinet.yaml
//!
//! # Validate configuration
//! docs-cabinet validate --show-config
//!
//! # Issue and inspect tokens
//! docs-cabinet issue-token --id 5 --role-id 0
//! docs-cabinet verify-token eyJhbGciOi...
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{CabinetRuntime, RuntimeBuilder};
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
