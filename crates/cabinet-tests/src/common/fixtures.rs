// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built test data for consistent and reproducible testing.
//!
//! The seeded directory holds an administrator (1), a second administrator
//! tier (2) and two regular users (5 and 9).

use cabinet_api::{Access, Document, InMemoryDirectory, User};

/// Signing secret shared by the harness and the token builder.
pub const TEST_SECRET: &str = "integration-test-secret-that-is-long";

/// A different secret, for forged tokens.
pub const FOREIGN_SECRET: &str = "some-other-secret-nobody-configured";

/// The instant the harness clock is frozen at (2023-11-14T22:13:20Z).
pub const TEST_NOW: i64 = 1_700_000_000;

/// One day in seconds.
pub const DAY_SECS: i64 = 24 * 60 * 60;

// =============================================================================
// User Fixtures
// =============================================================================

/// Fixture providing the seeded users.
pub struct UserFixtures;

impl UserFixtures {
    /// Administrator, role 1.
    pub const ADMIN: i64 = 1;
    /// Higher administrator tier, role 2.
    pub const SUPERVISOR: i64 = 2;
    /// Regular user, role 0.
    pub const READER: i64 = 5;
    /// Another regular user, role 0.
    pub const OTHER: i64 = 9;

    /// All seeded users.
    pub fn all() -> Vec<User> {
        vec![
            User::new(Self::ADMIN, "admin", 1),
            User::new(Self::SUPERVISOR, "supervisor", 2),
            User::new(Self::READER, "reader", 0),
            User::new(Self::OTHER, "other", 0),
        ]
    }
}

// =============================================================================
// Document Fixtures
// =============================================================================

/// Fixture providing the seeded documents.
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// All seeded documents. The reader owns two, the other user one.
    pub fn all() -> Vec<Document> {
        vec![
            Document::new(10, UserFixtures::READER, "reading list"),
            Document::new(11, UserFixtures::READER, "tax return").with_access(Access::Public),
            Document::new(20, UserFixtures::OTHER, "diary"),
            Document::new(30, UserFixtures::ADMIN, "handbook").with_access(Access::Role),
        ]
    }

    /// Number of documents owned by `owner_id`.
    pub fn count_for(owner_id: i64) -> usize {
        Self::all()
            .iter()
            .filter(|doc| doc.owner_id == owner_id)
            .count()
    }
}

/// Directory seeded with the user and document fixtures.
pub fn fixture_directory() -> InMemoryDirectory {
    InMemoryDirectory::seeded(UserFixtures::all(), DocumentFixtures::all())
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Fixture providing configuration file contents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A complete YAML configuration.
    pub fn yaml() -> String {
        format!(
            r#"
server:
  host: 127.0.0.1
  port: 8181
  request_timeout_secs: 10

security:
  secret: "{secret}"
  algorithm: HS256
  token_expiration_secs: 259200
  auth_header: x-docs-cabinet-authentication
  principal_id_claim: id

logging:
  level: info
  format: text

directory:
  users:
    - {{ id: 1, username: admin, role_id: 1 }}
    - {{ id: 5, username: reader, role_id: 0 }}
  documents:
    - {{ id: 10, owner_id: 5, title: reading list }}
    - {{ id: 11, owner_id: 5, title: tax return, access: public }}
"#,
            secret = TEST_SECRET
        )
    }

    /// The same configuration in TOML.
    pub fn toml() -> String {
        format!(
            r#"
[server]
host = "127.0.0.1"
port = 8181

[security]
secret = "{secret}"
principal_id_claim = "userId"

[[directory.users]]
id = 1
username = "admin"
role_id = 1

[[directory.documents]]
id = 30
owner_id = 1
title = "handbook"
access = "role"
"#,
            secret = TEST_SECRET
        )
    }

    /// A minimal JSON configuration.
    pub fn json() -> String {
        serde_json::json!({
            "server": { "port": 8282 },
            "security": { "secret": TEST_SECRET, "auth_header": "x-token" },
            "directory": {
                "users": [ { "id": 5, "username": "reader", "roleId": 0 } ],
                "documents": [ { "id": 10, "ownerId": 5, "title": "notes" } ]
            }
        })
        .to_string()
    }
}
