// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User and document directory.
//!
//! The directory is the lookup seam handlers read users and documents
//! through. [`InMemoryDirectory`] keeps everything in process memory so the
//! server runs without a storage engine.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

// =============================================================================
// Records
// =============================================================================

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Role ID (`0` regular, `>= 1` admin tier).
    pub role_id: i64,
}

impl User {
    /// Creates a new user.
    pub fn new(id: i64, username: impl Into<String>, role_id: i64) -> Self {
        Self {
            id,
            username: username.into(),
            role_id,
        }
    }
}

/// Visibility of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Visible to everyone.
    Public,
    /// Visible to the owner.
    #[default]
    Private,
    /// Visible to principals of the owner's role.
    Role,
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document ID.
    pub id: i64,
    /// Owning user ID.
    pub owner_id: i64,
    /// Title.
    pub title: String,
    /// Visibility.
    #[serde(default)]
    pub access: Access,
}

impl Document {
    /// Creates a private document.
    pub fn new(id: i64, owner_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            title: title.into(),
            access: Access::Private,
        }
    }

    /// Sets the visibility.
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }
}

// =============================================================================
// Directory Trait
// =============================================================================

/// Read access to users and their documents.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Returns the user with the given ID, if any.
    async fn user(&self, id: i64) -> ApiResult<Option<User>>;

    /// Returns all users ordered by ID.
    async fn users(&self) -> ApiResult<Vec<User>>;

    /// Returns the documents owned by `owner_id` ordered by ID.
    async fn documents_for(&self, owner_id: i64) -> ApiResult<Vec<Document>>;

    /// Returns the directory name for logging.
    fn name(&self) -> &str;
}

// =============================================================================
// InMemoryDirectory
// =============================================================================

/// Directory held in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: Arc<RwLock<BTreeMap<i64, User>>>,
    documents: Arc<RwLock<BTreeMap<i64, Document>>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory holding the given records.
    pub fn seeded(
        users: impl IntoIterator<Item = User>,
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        let directory = Self::new();
        for user in users {
            directory.insert_user(user);
        }
        for document in documents {
            directory.insert_document(document);
        }
        directory
    }

    /// Inserts or replaces a user.
    pub fn insert_user(&self, user: User) {
        self.users.write().insert(user.id, user);
    }

    /// Inserts or replaces a document.
    pub fn insert_document(&self, document: Document) {
        self.documents.write().insert(document.id, document);
    }

    /// Returns the number of users.
    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }

    /// Returns the number of documents.
    pub fn document_count(&self) -> usize {
        self.documents.read().len()
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn user(&self, id: i64) -> ApiResult<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn users(&self) -> ApiResult<Vec<User>> {
        Ok(self.users.read().values().cloned().collect())
    }

    async fn documents_for(&self, owner_id: i64) -> ApiResult<Vec<Document>> {
        Ok(self
            .documents
            .read()
            .values()
            .filter(|doc| doc.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// =============================================================================
// Tests
// =============================================================================
