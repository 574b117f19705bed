// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("Docs Cabinet");
    println!();
    println!("Version Information:");
    println!("  cabinet-bin:    {}", crate::VERSION);
    println!("  cabinet-api:    {}", cabinet_api::VERSION);
    println!("  cabinet-config: {}", cabinet_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("Defaults:");
    println!("  Auth header:  {}", cabinet_api::DEFAULT_AUTH_HEADER);
    println!(
        "  Token TTL:    {}s",
        cabinet_api::auth::DEFAULT_TOKEN_EXPIRATION_SECS
    );
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
