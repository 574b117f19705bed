// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `serve`: Start the API server
//! - `validate`: Validate configuration file
//! - `issue-token`: Sign a token for a principal
//! - `verify-token`: Verify a token
//! - `version`: Show version information

mod serve;
mod token;
mod validate;
mod version;

pub use serve::serve;
pub use token::{inspect_token, issue_token, mint_token, verifier_from_config, verify_token};
pub use validate::{collect_warnings, validate};
pub use version::version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Serve(args) => serve::serve(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::IssueToken(args) => token::issue_token(&cli, args),
        Commands::VerifyToken(args) => token::verify_token(&cli, args),
        Commands::Version => version::version(&cli),
    }
}
