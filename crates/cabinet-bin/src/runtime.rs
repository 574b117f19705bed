// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! Turns a loaded [`CabinetConfig`] into the API server's configuration and
//! directory, then serves until shutdown is signaled.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use cabinet_api::{
    Access, Algorithm, ApiConfig, ApiServer, Document, InMemoryDirectory, PrincipalIdClaim,
    TokenConfig, User,
};
use cabinet_config::{
    load_config, CabinetConfig, DirectoryConfig, DocumentAccess, IdClaim, SecurityConfig,
    TokenAlgorithm,
};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// CabinetRuntime
// =============================================================================

/// The server runtime.
///
/// The runtime is responsible for:
/// - Mapping configuration onto the API server
/// - Seeding the in-memory directory
/// - Coordinating graceful shutdown
pub struct CabinetRuntime {
    config: Arc<CabinetConfig>,
    shutdown: ShutdownCoordinator,
}

impl CabinetRuntime {
    /// Creates a new runtime.
    pub fn new(config: CabinetConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Uses the given shutdown coordinator instead of a private one.
    pub fn with_shutdown(mut self, shutdown: ShutdownCoordinator) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &CabinetConfig {
        &self.config
    }

    /// Builds the API server described by the configuration.
    pub fn build_server(&self) -> BinResult<ApiServer> {
        let directory = seed_directory(&self.config.directory);
        debug!(
            users = directory.user_count(),
            documents = directory.document_count(),
            "Directory seeded"
        );

        ApiServer::builder()
            .config(api_config(&self.config)?)
            .directory(Arc::new(directory))
            .build()
            .map_err(|e| BinError::init(e.to_string()))
    }

    /// Runs the server until shutdown is signaled.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting Docs Cabinet v{}", cabinet_api::VERSION);

        let server = self.build_server()?;
        info!(
            "Docs Cabinet is ready (API: {}, auth header: {})",
            server.addr(),
            self.config.security.auth_header
        );

        let signals = tokio::spawn({
            let shutdown = self.shutdown.clone();
            async move { shutdown.wait_for_shutdown().await }
        });

        let result = server
            .run_with_shutdown(self.shutdown.shutdown_signal().wait())
            .await;
        signals.abort();

        result.map_err(|e| BinError::from(e).with_context("API server stopped"))?;

        info!("Docs Cabinet shutdown complete");
        Ok(())
    }
}

// =============================================================================
// Configuration Mapping
// =============================================================================

/// Maps the security section onto the verifier configuration.
pub fn token_config(security: &SecurityConfig) -> BinResult<TokenConfig> {
    let secret = security
        .secret
        .as_ref()
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| BinError::config("security.secret is not set"))?;

    let algorithm = match security.algorithm {
        TokenAlgorithm::HS256 => Algorithm::HS256,
        TokenAlgorithm::HS384 => Algorithm::HS384,
        TokenAlgorithm::HS512 => Algorithm::HS512,
    };
    let id_claim = match security.principal_id_claim {
        IdClaim::Id => PrincipalIdClaim::Id,
        IdClaim::UserId => PrincipalIdClaim::UserId,
    };

    let mut token = TokenConfig::new(secret.expose())
        .with_algorithm(algorithm)
        .with_expiration(security.token_expiration())
        .with_principal_id_claim(id_claim);
    token.leeway_secs = i64::try_from(security.leeway_secs)
        .map_err(|_| BinError::config("security.leeway_secs is too large"))?;

    Ok(token)
}

/// Maps the full configuration onto the API server configuration.
pub fn api_config(config: &CabinetConfig) -> BinResult<ApiConfig> {
    Ok(ApiConfig::new()
        .with_host(config.server.host)
        .with_port(config.server.port)
        .with_request_timeout(config.server.request_timeout())
        .with_auth_header(config.security.auth_header.clone())
        .with_token(token_config(&config.security)?))
}

/// Builds the in-memory directory from the seed records.
pub fn seed_directory(seeds: &DirectoryConfig) -> InMemoryDirectory {
    let users = seeds
        .users
        .iter()
        .map(|seed| User::new(seed.id, seed.username.clone(), seed.role_id));
    let documents = seeds.documents.iter().map(|seed| {
        let access = match seed.access {
            DocumentAccess::Public => Access::Public,
            DocumentAccess::Private => Access::Private,
            DocumentAccess::Role => Access::Role,
        };
        Document::new(seed.id, seed.owner_id, seed.title.clone()).with_access(access)
    });

    InMemoryDirectory::seeded(users, documents)
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<CabinetConfig>,
    host: Option<IpAddr>,
    port: Option<u16>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly.
    pub fn config(mut self, config: CabinetConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the bind address.
    pub fn host(mut self, host: Option<IpAddr>) -> Self {
        self.host = host;
        self
    }

    /// Overrides the port.
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<CabinetRuntime> {
        let mut config = match self.config {
            Some(cfg) => cfg,
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::config("No configuration provided"))?;

                load_config(&path).map_err(|e| {
                    BinError::from(e).with_context(format!("Failed to load {}", path.display()))
                })?
            }
        };

        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            if port == 0 {
                return Err(BinError::config("port cannot be zero"));
            }
            config.server.port = port;
        }

        Ok(CabinetRuntime::new(config))
    }
}

// =============================================================================
// Tests
// =============================================================================
