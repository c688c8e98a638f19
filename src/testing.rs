// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared test fixtures.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::auth::{PasswordHasher, TokenService};
use crate::blockchain::{GrantReceipt, LedgerError, LedgerRole, RoleGranter};
use crate::state::AppState;
use crate::storage::{UserRecord, UserStore};

pub const TEST_SECRET: &str = "test-jwt-secret";
pub const TEST_TX_HASH: &str = "0x8f2a6b8c1b4f0e0f5b7c9d3e2a1f4c6b8d0e2f4a6c8e0b2d4f6a8c0e2b4d6f8a";

/// Outcome the fake ledger produces for grant calls.
#[derive(Clone)]
pub enum FakeOutcome {
    Confirmed,
    Reverted,
    Unconfigured,
}

/// In-memory ledger that records every grant request.
pub struct FakeLedger {
    outcome: FakeOutcome,
    granted: Mutex<Vec<(String, LedgerRole)>>,
}

impl FakeLedger {
    pub fn new(outcome: FakeOutcome) -> Self {
        Self {
            outcome,
            granted: Mutex::new(Vec::new()),
        }
    }

    pub fn grants(&self) -> Vec<(String, LedgerRole)> {
        self.granted.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoleGranter for FakeLedger {
    async fn grant_role(&self, account: &str, role: LedgerRole) -> Result<GrantReceipt, LedgerError> {
        match self.outcome {
            FakeOutcome::Confirmed => {
                self.granted.lock().unwrap().push((account.to_string(), role));
                Ok(GrantReceipt {
                    tx_hash: TEST_TX_HASH.to_string(),
                    block_number: Some(7),
                })
            }
            FakeOutcome::Reverted => Err(LedgerError::Reverted(TEST_TX_HASH.to_string())),
            FakeOutcome::Unconfigured => Err(LedgerError::NotConfigured("ADMIN_SECRET_SEED")),
        }
    }

    async fn has_role(&self, account: &str, role: LedgerRole) -> Result<bool, LedgerError> {
        if let FakeOutcome::Unconfigured = self.outcome {
            return Err(LedgerError::NotConfigured("LEDGER_RPC_URL"));
        }
        Ok(self
            .granted
            .lock()
            .unwrap()
            .iter()
            .any(|(a, r)| a == account && *r == role))
    }

    fn is_configured(&self) -> bool {
        !matches!(self.outcome, FakeOutcome::Unconfigured)
    }
}

/// State with a throwaway database and a confirming fake ledger.
pub fn test_state() -> (AppState, TempDir) {
    let (state, _ledger, dir) = test_state_with(FakeOutcome::Confirmed);
    (state, dir)
}

/// State with a throwaway database and the given ledger behaviour.
pub fn test_state_with(outcome: FakeOutcome) -> (AppState, Arc<FakeLedger>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let users = UserStore::new(dir.path().join("users.redb"));
    let ledger = Arc::new(FakeLedger::new(outcome));
    let state = AppState::new(TokenService::new(TEST_SECRET), users, ledger.clone())
        .with_password_hasher(PasswordHasher::new(4));
    (state, ledger, dir)
}

/// Insert a verified user directly into the store.
pub async fn seed_user(state: &AppState, username: &str, password: &str, wallet: &str) -> UserRecord {
    let hash = state.passwords.hash(password).await.unwrap();
    let record = UserRecord::new_verified(username.to_string(), wallet.to_string(), hash);
    state.users.get().await.unwrap().insert(&record).unwrap();
    record
}
