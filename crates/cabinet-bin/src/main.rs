// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Docs Cabinet
//!
//! Main binary entry point for the Docs Cabinet server.

use cabinet_bin::cli::Cli;
use cabinet_bin::error::report_error_and_exit;
use cabinet_bin::logging::{configured_logging, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let configured = configured_logging(&cli.config);
    init_logging(
        &cli.effective_log_level(configured.as_ref()),
        cli.effective_log_format(configured.as_ref()),
    );

    if let Err(error) = cabinet_bin::commands::execute(cli).await {
        report_error_and_exit(error);
    }
}
