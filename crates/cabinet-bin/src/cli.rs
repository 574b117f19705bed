// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `serve`: Start the server (default)
//! - `validate`: Validate configuration file
//! - `issue-token`: Sign a token for a principal
//! - `verify-token`: Verify a token and print its principal
//! - `version`: Show version information

use std::net::IpAddr;
use std::path::PathBuf;

use cabinet_config::{LogLevel, LoggingConfig};
use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Docs Cabinet
///
/// Document storage API guarded by signed tokens and role-based access rules.
#[derive(Parser, Debug)]
#[command(
    name = "docs-cabinet",
    author = "Sylvex <contact@sylvex.io>",
    version = cabinet_api::VERSION,
    about = "Docs Cabinet API server",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "cabinet.yaml",
        env = "DOCS_CABINET_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact); overrides the config file
    #[arg(long, env = "DOCS_CABINET_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the Docs Cabinet CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server
    ///
    /// This is the default command when no subcommand is specified.
    Serve(ServeArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration file without starting the server.
    Validate(ValidateArgs),

    /// Sign a token for the given principal
    ///
    /// Uses the secret, algorithm and id claim from the configuration file.
    IssueToken(IssueTokenArgs),

    /// Verify a token and print the principal it carries
    VerifyToken(VerifyTokenArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Override the bind address from the config file
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Override the port from the config file
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `issue-token` command.
#[derive(Args, Debug, Clone)]
pub struct IssueTokenArgs {
    /// Principal id
    #[arg(long, allow_hyphen_values = true)]
    pub id: i64,

    /// Role id (0 is a regular user, 1 or more is an administrator)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub role_id: i64,

    /// Token lifetime in seconds (defaults to the configured expiration)
    #[arg(long)]
    pub expires_in: Option<u64>,
}

/// Arguments for the `verify-token` command.
#[derive(Args, Debug, Clone)]
pub struct VerifyTokenArgs {
    /// The token to verify
    pub token: String,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<cabinet_config::LogFormat> for LogFormat {
    fn from(format: cabinet_config::LogFormat) -> Self {
        match format {
            cabinet_config::LogFormat::Text => LogFormat::Text,
            cabinet_config::LogFormat::Json => LogFormat::Json,
            cabinet_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Serve` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level.
    ///
    /// Flags win over `--log-level`, which wins over the config file.
    pub fn effective_log_level(&self, configured: Option<&LoggingConfig>) -> String {
        if self.quiet {
            return LogLevel::Warn.as_str().to_string();
        }
        if self.verbose {
            return LogLevel::Debug.as_str().to_string();
        }

        self.log_level
            .as_deref()
            .and_then(LogLevel::parse)
            .or_else(|| configured.map(|logging| logging.level))
            .unwrap_or_default()
            .as_str()
            .to_string()
    }

    /// Get the effective log format.
    pub fn effective_log_format(&self, configured: Option<&LoggingConfig>) -> LogFormat {
        self.log_format
            .or_else(|| configured.map(|logging| logging.format.into()))
            .unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
