// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Storage Module
//!
//! User records live in an embedded redb file (see [`users`]). Handlers do
//! not open it themselves: they receive a [`UserStore`] through `AppState`,
//! which opens the database on first use and keeps the handle for the rest
//! of the process lifetime.
//!
//! redb serializes write transactions internally and allows concurrent
//! readers, so the shared handle needs no extra locking.

pub mod users;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;

pub use users::{UserDatabase, UserRecord, UserStoreError, UserStoreResult};

/// Lazily opened, process-lifetime handle to the user database.
///
/// Cloning shares the same underlying handle.
#[derive(Clone)]
pub struct UserStore {
    path: PathBuf,
    db: Arc<OnceCell<Arc<UserDatabase>>>,
}

impl UserStore {
    /// Create a handle for the database at `path` without opening it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db: Arc::new(OnceCell::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the database, opening it on first use.
    ///
    /// A failed open is not cached; the next call tries again.
    pub async fn get(&self) -> UserStoreResult<Arc<UserDatabase>> {
        let db = self
            .db
            .get_or_try_init(|| async {
                tracing::info!(path = %self.path.display(), "Opening user database");
                UserDatabase::open(&self.path).map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(db))
    }
}
