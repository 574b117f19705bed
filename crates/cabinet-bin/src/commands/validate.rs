// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use cabinet_config::schema::MIN_SECRET_LENGTH;
use cabinet_config::{CabinetConfig, SecretValue};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Placeholder printed instead of the signing secret.
const MASKED_SECRET: &str = "********";

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::Configuration(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = cabinet_config::load_config(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;

    let warnings = collect_warnings(&config);
    let shown = args.show_config.then(|| masked(&config));

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  API: {}", config.server.socket_addr());
            println!("  Auth header: {}", config.security.auth_header);
            println!("  Algorithm: {}", config.security.algorithm.as_str());
            println!("  Token lifetime: {}s", config.security.token_expiration_secs);
            println!("  Id claim: {}", config.security.principal_id_claim.as_str());
            println!("  Users: {}", config.directory.users.len());
            println!("  Documents: {}", config.directory.documents.len());

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if let Some(shown) = &shown {
                println!();
                println!("Parsed configuration:");
                println!("{}", to_pretty_json(shown)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "bind_address": config.server.socket_addr().to_string(),
                    "auth_header": config.security.auth_header,
                    "algorithm": config.security.algorithm.as_str(),
                    "token_expiration_secs": config.security.token_expiration_secs,
                    "principal_id_claim": config.security.principal_id_claim.as_str(),
                    "user_count": config.directory.users.len(),
                    "document_count": config.directory.documents.len(),
                },
                "warnings": warnings,
                "config": shown,
            });
            println!("{}", to_pretty_json(&output)?);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::Configuration(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Returns problems that do not stop the server from starting.
pub fn collect_warnings(config: &CabinetConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(secret) = &config.security.secret {
        if secret.len() < MIN_SECRET_LENGTH {
            warnings.push(format!(
                "security.secret is shorter than {} bytes",
                MIN_SECRET_LENGTH
            ));
        }
    }

    if config.directory.users.is_empty() {
        warnings.push("No users seeded; every user route will answer 404".to_string());
    } else if !config.directory.users.iter().any(|user| user.role_id > 0) {
        warnings.push("No administrator (role_id >= 1) seeded".to_string());
    }

    if config.security.leeway_secs > 0 {
        warnings.push(format!(
            "Tokens are accepted up to {}s after they expire",
            config.security.leeway_secs
        ));
    }

    warnings
}

fn masked(config: &CabinetConfig) -> CabinetConfig {
    let mut shown = config.clone();
    if shown.security.secret.is_some() {
        shown.security.secret = Some(SecretValue::new(MASKED_SECRET));
    }
    shown
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> BinResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| BinError::runtime(e.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
