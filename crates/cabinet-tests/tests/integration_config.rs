// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! Integration tests for cabinet-config:
//!
//! - Loading YAML, TOML and JSON files from disk
//! - Validation rules
//! - Environment variable placeholders and overrides
//!
//! ## Test Categories
//!
//! - `test_load_*`: File loading
//! - `test_validation_*`: Validation failures
//! - `test_env_*`: Environment handling

use std::collections::HashMap;
use std::fs;

use cabinet_config::{
    CabinetConfig, ConfigError, ConfigFormat, ConfigLoader, DocumentAccess, IdClaim, LogLevel,
};
use cabinet_tests::common::temp_test_dir;
use cabinet_tests::prelude::*;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

fn load_file(name: &str, content: &str) -> Result<CabinetConfig, ConfigError> {
    let dir = temp_test_dir("cabinet-config");
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    ConfigLoader::new().load_with(&path, no_env)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_yaml_file() {
    let config = load_file("cabinet.yaml", &ConfigFixtures::yaml()).unwrap();

    assert_eq!(config.server.port, 8181);
    assert_eq!(config.server.request_timeout_secs, 10);
    assert_eq!(config.security.secret.as_ref().unwrap().expose(), TEST_SECRET);
    assert_eq!(config.security.auth_header, DEFAULT_AUTH_HEADER);
    assert_eq!(config.security.token_expiration_secs, 3 * DAY_SECS as u64);
    assert_eq!(config.directory.users.len(), 2);
    assert_eq!(config.directory.documents[1].access, DocumentAccess::Public);
}

#[test]
fn test_load_toml_file() {
    let config = load_file("cabinet.toml", &ConfigFixtures::toml()).unwrap();

    assert_eq!(config.security.principal_id_claim, IdClaim::UserId);
    assert_eq!(config.directory.documents[0].access, DocumentAccess::Role);
}

#[test]
fn test_load_json_file_with_camel_case_seeds() {
    let config = load_file("cabinet.json", &ConfigFixtures::json()).unwrap();

    assert_eq!(config.server.port, 8282);
    assert_eq!(config.security.auth_header, "x-token");
    assert_eq!(config.directory.documents[0].owner_id, 5);
}

#[test]
fn test_load_defaults_for_omitted_sections() {
    let config = load_file("cabinet.json", &ConfigFixtures::json()).unwrap();

    assert_eq!(config.server.host.to_string(), "0.0.0.0");
    assert_eq!(config.security.principal_id_claim, IdClaim::Id);
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[test]
fn test_load_unsupported_extension() {
    let result = load_file("cabinet.ini", "port=1");
    assert!(matches!(result, Err(ConfigError::UnsupportedFormat { .. })));
}

#[test]
fn test_load_secret_is_masked_in_debug() {
    let config = load_file("cabinet.yaml", &ConfigFixtures::yaml()).unwrap();

    assert!(!format!("{:?}", config).contains(TEST_SECRET));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validation_missing_secret() {
    let result = ConfigLoader::new().load_from_str_with("{}", ConfigFormat::Json, no_env);
    assert!(matches!(result, Err(ConfigError::MissingField { .. })));
}

#[test]
fn test_validation_duplicate_user() {
    let yaml = format!(
        "security:\n  secret: {}\ndirectory:\n  users:\n    - {{ id: 5, username: a }}\n    - {{ id: 5, username: b }}\n",
        TEST_SECRET
    );
    let result = ConfigLoader::new().load_from_str_with(&yaml, ConfigFormat::Yaml, no_env);
    assert!(matches!(
        result,
        Err(ConfigError::DuplicateId { kind: "user", id: 5 })
    ));
}

#[test]
fn test_validation_document_with_unknown_owner() {
    let yaml = format!(
        "security:\n  secret: {}\ndirectory:\n  documents:\n    - {{ id: 1, owner_id: 77, title: orphan }}\n",
        TEST_SECRET
    );
    let result = ConfigLoader::new().load_from_str_with(&yaml, ConfigFormat::Yaml, no_env);
    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

#[test]
fn test_validation_uppercase_header() {
    let json = serde_json::json!({
        "security": { "secret": TEST_SECRET, "auth_header": "X-Token" }
    })
    .to_string();
    let result = ConfigLoader::new().load_from_str_with(&json, ConfigFormat::Json, no_env);
    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

#[test]
fn test_validation_zero_expiration() {
    let json = serde_json::json!({
        "security": { "secret": TEST_SECRET, "token_expiration_secs": 0 }
    })
    .to_string();
    let result = ConfigLoader::new().load_from_str_with(&json, ConfigFormat::Json, no_env);
    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

#[test]
fn test_validation_unknown_id_claim() {
    let json = serde_json::json!({
        "security": { "secret": TEST_SECRET, "principal_id_claim": "sub" }
    })
    .to_string();
    let result = ConfigLoader::new().load_from_str_with(&json, ConfigFormat::Json, no_env);
    assert!(result.is_err());
}

// =============================================================================
// Environment
// =============================================================================

#[test]
fn test_env_placeholder_in_file() {
    let dir = temp_test_dir("cabinet-config");
    let path = dir.path().join("cabinet.yaml");
    fs::write(
        &path,
        "security:\n  secret: \"${CABINET_IT_SECRET}\"\nserver:\n  port: ${CABINET_IT_PORT:9191}\n",
    )
    .unwrap();

    let config = ConfigLoader::new()
        .load_with(&path, env(&[("CABINET_IT_SECRET", TEST_SECRET)]))
        .unwrap();

    assert_eq!(config.security.secret.unwrap().expose(), TEST_SECRET);
    assert_eq!(config.server.port, 9191);
}

#[test]
fn test_env_secret_fallback() {
    let config = ConfigLoader::new()
        .load_from_str_with("{}", ConfigFormat::Json, env(&[("SECRET", TEST_SECRET)]))
        .unwrap();

    assert_eq!(config.security.secret.unwrap().expose(), TEST_SECRET);
}

#[test]
fn test_env_prefixed_secret_wins_over_fallback() {
    let config = ConfigLoader::new()
        .load_from_str_with(
            "{}",
            ConfigFormat::Json,
            env(&[
                ("SECRET", "fallback-secret-value-long-enough!"),
                ("DOCS_CABINET_SECRET", TEST_SECRET),
            ]),
        )
        .unwrap();

    assert_eq!(config.security.secret.unwrap().expose(), TEST_SECRET);
}

#[test]
fn test_env_custom_prefix() {
    let config = ConfigLoader::builder()
        .env_prefix("CABINET_IT")
        .build()
        .load_from_str_with(
            "{}",
            ConfigFormat::Json,
            env(&[("CABINET_IT_SECRET", TEST_SECRET), ("CABINET_IT_PORT", "7000")]),
        )
        .unwrap();

    assert_eq!(config.server.port, 7000);
}
