// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading and processing for Docs Cabinet.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` and `${VAR:default}` placeholders in the raw content
//! 3. Parse YAML, TOML or JSON
//! 4. Apply environment variable overrides
//! 5. Validate configuration
//!
//! # Environment Variable Override
//!
//! ```text
//! DOCS_CABINET_SECRET=...
//! DOCS_CABINET_HOST=127.0.0.1
//! DOCS_CABINET_PORT=9090
//! DOCS_CABINET_AUTH_HEADER=x-docs-cabinet-authentication
//! DOCS_CABINET_TOKEN_EXPIRATION_SECS=259200
//! DOCS_CABINET_LOG_LEVEL=debug
//! ```
//!
//! When no secret is configured, the plain `SECRET` variable is used.

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{CabinetConfig, LogLevel, SecretValue};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "DOCS_CABINET";

/// Variable the signing secret falls back to.
pub const FALLBACK_SECRET_VAR: &str = "SECRET";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for Docs Cabinet.
///
/// # Examples
///
/// ```no_run
/// use cabinet_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("cabinet.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve environment variables in values.
    resolve_env_vars: bool,

    /// Whether to run validation after loading.
    validate: bool,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
            validate: true,
        }
    }

    /// Creates a builder for configuring the loader.
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Enables or disables validation.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<CabinetConfig> {
        self.load_with(path, process_env)
    }

    /// Loads configuration from a file, reading variables through `lookup`.
    pub fn load_with<F>(&self, path: impl AsRef<Path>, lookup: F) -> ConfigResult<CabinetConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;

        let content = if self.resolve_env_vars {
            resolve_env_placeholders(&content, &lookup)
        } else {
            content
        };

        let config = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        let config = self.finish(config, &lookup)?;

        info!("Configuration loaded successfully");
        debug!(
            users = config.directory.users.len(),
            documents = config.directory.documents.len(),
            "Directory seeds loaded"
        );

        Ok(config)
    }

    /// Loads configuration from a string, reading variables through `lookup`.
    pub fn load_from_str_with<F>(
        &self,
        content: &str,
        format: ConfigFormat,
        lookup: F,
    ) -> ConfigResult<CabinetConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = if self.resolve_env_vars {
            parse_str(&resolve_env_placeholders(content, &lookup), format)?
        } else {
            parse_str(content, format)?
        };

        self.finish(config, &lookup)
    }

    /// Applies overrides and validation.
    fn finish<F>(&self, mut config: CabinetConfig, lookup: &F) -> ConfigResult<CabinetConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config, lookup)?;
        }

        if self.validate {
            config.validate()?;
        }

        Ok(config)
    }

    /// Reads file content.
    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides<F>(&self, config: &mut CabinetConfig, lookup: &F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| format!("{}_{}", self.env_prefix, suffix);

        if let Some(value) = lookup(&var("SECRET")) {
            config.security.secret = Some(SecretValue::new(value));
        } else if config.security.secret.as_ref().map_or(true, |s| s.is_empty()) {
            if let Some(value) = lookup(FALLBACK_SECRET_VAR) {
                debug!("Using {} as the signing secret", FALLBACK_SECRET_VAR);
                config.security.secret = Some(SecretValue::new(value));
            }
        }

        if let Some(value) = lookup(&var("HOST")) {
            config.server.host = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(var("HOST"), "expected IP address")
            })?;
        }
        if let Some(value) = lookup(&var("PORT")) {
            config.server.port = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(var("PORT"), "expected valid port number")
            })?;
        }

        if let Some(value) = lookup(&var("AUTH_HEADER")) {
            config.security.auth_header = value;
        }
        if let Some(value) = lookup(&var("TOKEN_EXPIRATION_SECS")) {
            config.security.token_expiration_secs = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(var("TOKEN_EXPIRATION_SECS"), "expected valid number")
            })?;
        }

        if let Some(value) = lookup(&var("LOG_LEVEL")) {
            match LogLevel::parse(&value) {
                Some(level) => config.logging.level = level,
                None => warn!("Ignoring unknown log level '{}' in {}", value, var("LOG_LEVEL")),
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigLoaderBuilder
// =============================================================================

/// Builder for ConfigLoader.
#[derive(Debug, Default)]
pub struct ConfigLoaderBuilder {
    env_prefix: Option<String>,
    resolve_env_vars: Option<bool>,
    validate: Option<bool>,
}

impl ConfigLoaderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn resolve_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = Some(enabled);
        self
    }

    /// Enables or disables validation.
    pub fn validate(mut self, enabled: bool) -> Self {
        self.validate = Some(enabled);
        self
    }

    /// Builds the ConfigLoader.
    pub fn build(self) -> ConfigLoader {
        let mut loader = ConfigLoader::new();

        if let Some(prefix) = self.env_prefix {
            loader.env_prefix = prefix;
        }
        if let Some(resolve_env_vars) = self.resolve_env_vars {
            loader.resolve_env_vars = resolve_env_vars;
        }
        if let Some(validate) = self.validate {
            loader.validate = validate;
        }

        loader
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reads a variable from the process environment.
fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Parses a string based on format.
fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<CabinetConfig> {
    match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// Resolves environment variable placeholders in content.
///
/// Supports the format: `${VAR_NAME}` or `${VAR_NAME:default}`. Unknown
/// variables without a default are left in place.
fn resolve_env_placeholders<F>(content: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' || chars.peek() != Some(&'{') {
            result.push(c);
            continue;
        }
        chars.next(); // consume '{'

        let mut var_content = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            var_content.push(c);
        }

        if !found_close {
            result.push_str("${");
            result.push_str(&var_content);
            continue;
        }

        let (var_name, default_value) = match var_content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (var_content.as_str(), None),
        };

        match (lookup(var_name), default_value) {
            (Some(value), _) => result.push_str(&value),
            (None, Some(default)) => result.push_str(default),
            (None, None) => {
                warn!("Environment variable '{}' not found", var_name);
                result.push_str(&format!("${{{}}}", var_name));
            }
        }
    }

    result
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<CabinetConfig> {
    ConfigLoader::new().load(path)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IdClaim, LogFormat, TokenAlgorithm};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const YAML: &str = r#"
server:
  host: 127.0.0.1
  port: 3000

security:
  secret: "${CABINET_TEST_SECRET:fallback-secret-that-is-long-enough}"
  principal_id_claim: userId

logging:
  level: debug
  format: json

directory:
  users:
    - { id: 1, username: admin, role_id: 1 }
    - { id: 5, username: reader, roleId: 0 }
  documents:
    - { id: 10, owner_id: 5, title: notes }
"#;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = ConfigLoader::new().load_with(file.path(), env(&[])).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.security.secret.as_ref().unwrap().expose(),
            "fallback-secret-that-is-long-enough"
        );
        assert_eq!(config.security.principal_id_claim, IdClaim::UserId);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.directory.users[1].role_id, 0);
        assert_eq!(config.directory.documents[0].owner_id, 5);
    }

    #[test]
    fn test_load_toml() {
        let toml = r#"
[server]
port = 9000

[security]
secret = "toml-secret-that-is-long-enough-ok"
algorithm = "HS512"
token_expiration_secs = 60
"#;
        let config = ConfigLoader::new()
            .load_from_str_with(toml, ConfigFormat::Toml, env(&[]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.security.algorithm, TokenAlgorithm::HS512);
        assert_eq!(config.security.token_expiration_secs, 60);
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("cabinet.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("cabinet.JSON")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("cabinet.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("cabinet")).is_err());
    }

    #[test]
    fn test_env_placeholders() {
        let lookup = env(&[("PORT_VAR", "4000")]);
        assert_eq!(
            resolve_env_placeholders("port: ${PORT_VAR}", &lookup),
            "port: 4000"
        );
        assert_eq!(
            resolve_env_placeholders("port: ${MISSING:8080}", &lookup),
            "port: 8080"
        );
        assert_eq!(resolve_env_placeholders("x: ${MISSING}", &lookup), "x: ${MISSING}");
        assert_eq!(resolve_env_placeholders("x: ${OPEN", &lookup), "x: ${OPEN");
        assert_eq!(resolve_env_placeholders("cost: $5", &lookup), "cost: $5");
    }

    #[test]
    fn test_env_overrides() {
        let lookup = env(&[
            ("DOCS_CABINET_SECRET", "override-secret-that-is-long-enough"),
            ("DOCS_CABINET_PORT", "7070"),
            ("DOCS_CABINET_HOST", "127.0.0.1"),
            ("DOCS_CABINET_AUTH_HEADER", "x-token"),
            ("DOCS_CABINET_TOKEN_EXPIRATION_SECS", "120"),
            ("DOCS_CABINET_LOG_LEVEL", "warn"),
        ]);
        let config = ConfigLoader::new()
            .load_from_str_with("{}", ConfigFormat::Json, lookup)
            .unwrap();

        assert_eq!(config.security.secret.unwrap().expose(), "override-secret-that-is-long-enough");
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.security.auth_header, "x-token");
        assert_eq!(config.security.token_expiration_secs, 120);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_secret_fallback() {
        let config = ConfigLoader::new()
            .load_from_str_with("{}", ConfigFormat::Json, env(&[("SECRET", "plain-secret")]))
            .unwrap();
        assert_eq!(config.security.secret.unwrap().expose(), "plain-secret");

        let json = r#"{ "security": { "secret": "file-secret" } }"#;
        let config = ConfigLoader::new()
            .load_from_str_with(json, ConfigFormat::Json, env(&[("SECRET", "plain-secret")]))
            .unwrap();
        assert_eq!(config.security.secret.unwrap().expose(), "file-secret");
    }

    #[test]
    fn test_invalid_env_var() {
        let result = ConfigLoader::new().load_from_str_with(
            "{}",
            ConfigFormat::Json,
            env(&[("SECRET", "s"), ("DOCS_CABINET_PORT", "eighty")]),
        );
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let result = ConfigLoader::new().load_from_str_with("{}", ConfigFormat::Json, env(&[]));
        assert!(matches!(result, Err(ConfigError::MissingField { .. })));

        let config = ConfigLoader::builder()
            .validate(false)
            .build()
            .load_from_str_with("{}", ConfigFormat::Json, env(&[]))
            .unwrap();
        assert!(config.security.secret.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ConfigLoader::new().load_from_str_with(
            r#"{ "server": { "prot": 1 } }"#,
            ConfigFormat::Json,
            env(&[("SECRET", "s")]),
        );
        assert!(matches!(result, Err(ConfigError::Serialization { .. })));
    }

    #[test]
    fn test_loader_builder() {
        let loader = ConfigLoader::builder()
            .env_prefix("MYAPP")
            .resolve_env_vars(false)
            .build();

        assert_eq!(loader.env_prefix, "MYAPP");
        assert!(!loader.resolve_env_vars);
        assert!(loader.validate);
    }

    #[test]
    fn test_file_not_found() {
        let result = ConfigLoader::new().load("/nonexistent/path/cabinet.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(b"{ not json").unwrap();

        let result = ConfigLoader::new().load_with(file.path(), env(&[]));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
