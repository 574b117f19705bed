// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `issue-token` and `verify-token` commands.

use std::path::Path;

use cabinet_api::auth::Clock;
use cabinet_api::{ApiError, Principal, SystemClock, TokenVerifier};
use chrono::SecondsFormat;
use serde_json::json;
use tracing::debug;

use crate::cli::{Cli, IssueTokenArgs, VerifyTokenArgs};
use crate::error::{BinError, BinResult};
use crate::runtime::token_config;

/// Builds a verifier from the security section of the configuration file.
pub fn verifier_from_config(path: &Path) -> BinResult<TokenVerifier> {
    let config = cabinet_config::load_config(path)?;
    let verifier = TokenVerifier::new(token_config(&config.security)?)?;
    debug!(?verifier, "Token verifier ready");
    Ok(verifier)
}

/// Executes the `issue-token` command.
pub fn issue_token(cli: &Cli, args: IssueTokenArgs) -> BinResult<()> {
    let verifier = verifier_from_config(&cli.config)?;
    let token = mint_token(&verifier, &args, SystemClock.now())?;
    println!("{}", token);
    Ok(())
}

/// Executes the `verify-token` command.
pub fn verify_token(cli: &Cli, args: VerifyTokenArgs) -> BinResult<()> {
    let verifier = verifier_from_config(&cli.config)?;
    let report = inspect_token(&verifier, &args.token, SystemClock.now())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report).map_err(|e| BinError::runtime(e.to_string()))?
    );
    Ok(())
}

/// Signs a token for the principal described by `args`, issued at `now`.
pub fn mint_token(verifier: &TokenVerifier, args: &IssueTokenArgs, now: i64) -> BinResult<String> {
    let principal = Principal::new(args.id, args.role_id);

    let token = match args.expires_in {
        Some(secs) => {
            let secs = i64::try_from(secs)
                .map_err(|_| BinError::config("--expires-in is too large"))?;
            verifier.issue_with_expiration(principal, now, secs)?
        }
        None => verifier.issue(principal, now)?,
    };

    Ok(token)
}

/// Verifies `token` at `now` and describes the principal it carries.
///
/// A rejected token yields [`BinError::TokenRejected`] carrying the error
/// name the gate would answer with.
pub fn inspect_token(
    verifier: &TokenVerifier,
    token: &str,
    now: i64,
) -> BinResult<serde_json::Value> {
    let principal = verifier
        .verify(Some(token), now)
        .map_err(|rejection| BinError::TokenRejected(ApiError::from(rejection).error_name().into()))?;
    let claims = verifier
        .decode(token.trim(), now)
        .map_err(|rejection| BinError::TokenRejected(ApiError::from(rejection).error_name().into()))?;

    let timestamp = |at: Option<chrono::DateTime<chrono::Utc>>| {
        at.map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
    };

    Ok(json!({
        "id": principal.id,
        "roleId": principal.role_id,
        "admin": principal.is_admin(),
        "idClaim": verifier.principal_id_claim().as_str(),
        "issuedAt": timestamp(claims.issued_at()),
        "expiresAt": timestamp(claims.expires_at()),
        "expiresInSecs": claims.exp - now,
    }))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cabinet_api::TokenConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NOW: i64 = 1_700_000_000;

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(TokenConfig::new("cli-token-secret-that-is-long-enough")).unwrap()
    }

    fn args(id: i64, role_id: i64, expires_in: Option<u64>) -> IssueTokenArgs {
        IssueTokenArgs {
            id,
            role_id,
            expires_in,
        }
    }

    #[test]
    fn test_mint_and_inspect() {
        let verifier = verifier();
        let token = mint_token(&verifier, &args(5, 0, None), NOW).unwrap();

        let report = inspect_token(&verifier, &token, NOW + 10).unwrap();
        assert_eq!(report["id"], 5);
        assert_eq!(report["roleId"], 0);
        assert_eq!(report["admin"], false);
        assert_eq!(report["idClaim"], "id");
        assert_eq!(report["expiresInSecs"], 3 * 24 * 60 * 60 - 10);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let verifier = verifier();
        let token = mint_token(&verifier, &args(1, 1, Some(60)), NOW).unwrap();

        match inspect_token(&verifier, &token, NOW + 60) {
            Err(BinError::TokenRejected(name)) => assert_eq!(name, "InvalidTokenError"),
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_token_is_missing() {
        match inspect_token(&verifier(), "   ", NOW) {
            Err(BinError::TokenRejected(name)) => assert_eq!(name, "MissingTokenError"),
            other => panic!("Expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_verifier_from_config() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(
            b"security:\n  secret: file-secret-that-is-long-enough-too\n  principal_id_claim: userId\n",
        )
        .unwrap();

        let verifier = verifier_from_config(file.path()).unwrap();
        let token = mint_token(&verifier, &args(9, 2, None), NOW).unwrap();
        let report = inspect_token(&verifier, &token, NOW).unwrap();
        assert_eq!(report["idClaim"], "userId");
        assert_eq!(report["admin"], true);
    }
}
