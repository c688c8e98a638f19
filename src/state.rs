// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::blockchain::{LedgerClient, RoleGranter};
use crate::config::ServerConfig;
use crate::storage::UserStore;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Session token issuer/verifier
    pub tokens: Arc<TokenService>,
    /// Password hasher used at signup and login
    pub passwords: PasswordHasher,
    /// Lazily opened credential store
    pub users: UserStore,
    /// Ledger client for role grants
    pub ledger: Arc<dyn RoleGranter>,
}

impl AppState {
    pub fn new(tokens: TokenService, users: UserStore, ledger: Arc<dyn RoleGranter>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            passwords: PasswordHasher::default(),
            users,
            ledger,
        }
    }

    /// Build the production state from configuration.
    pub fn from_config(config: &ServerConfig) -> Self {
        let tokens = TokenService::new(&config.jwt_secret).with_ttl(config.token_ttl);
        let users = UserStore::new(config.users_db_path.clone());
        let ledger = Arc::new(LedgerClient::new(config.ledger.clone()));
        Self::new(tokens, users, ledger)
    }

    /// Override the password hasher (tests use a low work factor).
    pub fn with_password_hasher(mut self, passwords: PasswordHasher) -> Self {
        self.passwords = passwords;
        self
    }
}
