// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing (bcrypt).
//!
//! Hashing and verification are CPU-bound, so both run on tokio's blocking
//! pool instead of a runtime worker.

use std::sync::Arc;

use tokio::sync::OnceCell;

/// Work factor used for new password hashes.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Input of the hash checked when an account does not exist.
const ABSENT_ACCOUNT_PASSWORD: &str = "fermento:absent-account";

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Salted, adaptive password hasher.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash at `cost`, built on first use by [`PasswordHasher::verify_absent`]
    absent_hash: Arc<OnceCell<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            absent_hash: Arc::new(OnceCell::new()),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh salt.
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A stored hash that cannot be parsed counts as a mismatch; it is
    /// logged so a corrupt record does not go unnoticed.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();
        let outcome =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &stored_hash)).await?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is unreadable");
                Ok(false)
            }
        }
    }

    /// Do the work of [`verify`](Self::verify) for a username with no account.
    ///
    /// An unknown username must cost as much as a wrong password. The result
    /// is discarded.
    pub async fn verify_absent(&self, password: &str) -> Result<(), PasswordError> {
        let stored_hash = self
            .absent_hash
            .get_or_try_init(|| self.hash(ABSENT_ACCOUNT_PASSWORD))
            .await?;
        self.verify(password, stored_hash).await?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn has_absent_hash(&self) -> bool {
        self.absent_hash.initialized()
    }
}
