// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded user database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: username → serialized UserRecord
//! - `user_wallets`: wallet address → username
//!
//! Both uniqueness checks and the insert share one write transaction, so
//! concurrent signups for the same username or wallet cannot both land.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: username → serialized UserRecord (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Uniqueness index: wallet address (exact string) → username.
const USER_WALLETS: TableDefinition<&str, &str> = TableDefinition::new("user_wallets");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("failed to create data directory: {0}")]
    Io(#[from] std::io::Error),

    /// Username or wallet is already registered.
    #[error("user or wallet already exists")]
    Conflict,
}

pub type UserStoreResult<T> = Result<T, UserStoreError>;

// =============================================================================
// Records
// =============================================================================

/// A registered user.
///
/// Created once at signup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub wallet: String,
    pub password_hash: String,
    pub accepted_tos: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a new record for a user who accepted the terms of service.
    pub fn new_verified(username: String, wallet: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            wallet,
            password_hash,
            accepted_tos: true,
            created_at: Utc::now(),
        }
    }

    /// A record only backs privileged actions once the terms were accepted.
    pub fn is_verified(&self) -> bool {
        self.accepted_tos
    }
}

// =============================================================================
// UserDatabase
// =============================================================================

/// Credential store: find and insert only.
pub struct UserDatabase {
    db: Database,
}

impl UserDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> UserStoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_WALLETS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert a record unless its username or wallet is already taken.
    pub fn insert(&self, record: &UserRecord) -> UserStoreResult<()> {
        let json = serde_json::to_vec(record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let mut wallets = write_txn.open_table(USER_WALLETS)?;

            let username_taken = users.get(record.username.as_str())?.is_some();
            let wallet_taken = wallets.get(record.wallet.as_str())?.is_some();
            if username_taken || wallet_taken {
                // Dropping the transaction aborts it
                return Err(UserStoreError::Conflict);
            }

            users.insert(record.username.as_str(), json.as_slice())?;
            wallets.insert(record.wallet.as_str(), record.username.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a record by username.
    pub fn find_by_username(&self, username: &str) -> UserStoreResult<Option<UserRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(username)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Whether any record already uses this username or wallet.
    pub fn exists(&self, username: &str, wallet: &str) -> UserStoreResult<bool> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        let wallets = read_txn.open_table(USER_WALLETS)?;
        Ok(users.get(username)?.is_some() || wallets.get(wallet)?.is_some())
    }

    /// Find the verified record matching both username and wallet.
    pub fn find_verified(&self, username: &str, wallet: &str) -> UserStoreResult<Option<UserRecord>> {
        Ok(self
            .find_by_username(username)?
            .filter(|record| record.wallet == wallet && record.is_verified()))
    }

    /// Number of registered users.
    pub fn count(&self) -> UserStoreResult<u64> {
        use redb::ReadableTableMetadata;

        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        Ok(table.len()?)
    }

    /// Write a record bypassing the uniqueness checks.
    #[cfg(test)]
    pub(crate) fn put_raw(&self, record: &UserRecord) -> UserStoreResult<()> {
        let json = serde_json::to_vec(record)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            users.insert(record.username.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
