// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger client for role grants on the access-control contract.

use std::str::FromStr;

use alloy::{
    primitives::Address,
    providers::{Provider, ProviderBuilder},
};
use async_trait::async_trait;

use super::access_control::AccessControlContract;
use super::signing::wallet_from_seed;
use super::types::{GrantReceipt, LedgerConfig, LedgerRole};
use crate::config::{ADMIN_SECRET_SEED_ENV, CONTRACT_ADDRESS_ENV, LEDGER_RPC_URL_ENV};

/// Grants and queries contract roles.
///
/// Each call is a fresh attempt: nothing is retried or deduplicated here.
/// Granting a role twice is left to the contract.
#[async_trait]
pub trait RoleGranter: Send + Sync {
    /// Sign, submit, and confirm a grant of `role` to `account`.
    async fn grant_role(&self, account: &str, role: LedgerRole) -> Result<GrantReceipt, LedgerError>;

    /// Whether `account` currently holds `role`.
    async fn has_role(&self, account: &str, role: LedgerRole) -> Result<bool, LedgerError>;

    /// Whether all settings needed for a grant are present.
    fn is_configured(&self) -> bool;
}

/// Errors that can occur during ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Wallet {0} is not an EVM account")]
    UnsupportedWallet(String),

    #[error("Invalid admin key: {0}")]
    InvalidAdminKey(String),

    #[error("Ledger network mismatch: expected chain {expected}, node reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("Transaction confirmation failed: {0}")]
    Confirmation(String),

    #[error("Transaction {0} was reverted")]
    Reverted(String),
}

/// JSON-RPC ledger client.
///
/// Providers are built per call from the stored settings, so a request
/// never shares connection state with another.
pub struct LedgerClient {
    config: LedgerConfig,
}

impl LedgerClient {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    fn rpc_url(&self) -> Result<url::Url, LedgerError> {
        let raw = self
            .config
            .rpc_url
            .as_deref()
            .ok_or(LedgerError::NotConfigured(LEDGER_RPC_URL_ENV))?;
        raw.parse()
            .map_err(|e: url::ParseError| LedgerError::InvalidRpcUrl(e.to_string()))
    }

    fn contract_address(&self) -> Result<Address, LedgerError> {
        let raw = self
            .config
            .contract_address
            .as_deref()
            .ok_or(LedgerError::NotConfigured(CONTRACT_ADDRESS_ENV))?;
        parse_address(raw)
    }

    /// Refuse to sign for a network other than the configured one.
    async fn check_chain<P: Provider>(&self, provider: &P) -> Result<(), LedgerError> {
        let Some(expected) = self.config.chain_id else {
            return Ok(());
        };
        let actual = provider
            .get_chain_id()
            .await
            .map_err(|e| LedgerError::Rpc(e.to_string()))?;
        if actual != expected {
            return Err(LedgerError::ChainMismatch { expected, actual });
        }
        Ok(())
    }
}

#[async_trait]
impl RoleGranter for LedgerClient {
    async fn grant_role(&self, account: &str, role: LedgerRole) -> Result<GrantReceipt, LedgerError> {
        let seed = self
            .config
            .admin_secret_seed
            .as_deref()
            .ok_or(LedgerError::NotConfigured(ADMIN_SECRET_SEED_ENV))?;
        let (wallet, admin) = wallet_from_seed(seed)?;

        let account = parse_account(account)?;
        let url = self.rpc_url()?;
        let contract_address = self.contract_address()?;

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);
        self.check_chain(&provider).await?;

        tracing::info!(
            admin = %admin,
            account = %account,
            role = %role,
            contract = %contract_address,
            "Submitting role grant"
        );

        let contract = AccessControlContract::new(&provider, contract_address);
        let receipt = contract.grant_role(role.id(), account).await?;

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if !receipt.status() {
            return Err(LedgerError::Reverted(tx_hash));
        }

        Ok(GrantReceipt {
            tx_hash,
            block_number: receipt.block_number,
        })
    }

    async fn has_role(&self, account: &str, role: LedgerRole) -> Result<bool, LedgerError> {
        let account = parse_account(account)?;
        let url = self.rpc_url()?;
        let contract_address = self.contract_address()?;

        let provider = ProviderBuilder::new().connect_http(url);
        self.check_chain(&provider).await?;

        AccessControlContract::new(&provider, contract_address)
            .has_role(role.id(), account)
            .await
    }

    fn is_configured(&self) -> bool {
        self.config.is_complete()
    }
}

fn parse_address(raw: &str) -> Result<Address, LedgerError> {
    Address::from_str(raw.trim()).map_err(|e| LedgerError::InvalidAddress(format!("{raw}: {e}")))
}

/// Parse the user's wallet as the account to act on.
fn parse_account(raw: &str) -> Result<Address, LedgerError> {
    Address::from_str(raw.trim()).map_err(|_| LedgerError::UnsupportedWallet(raw.to_string()))
}

/// Normalize a wallet for storage and comparison.
///
/// Any spelling of an EVM address (case, `0x` prefix, surrounding
/// whitespace) maps to its checksummed form. Other strings are only trimmed.
pub fn canonical_wallet(raw: &str) -> String {
    let trimmed = raw.trim();
    match Address::from_str(trimmed) {
        Ok(address) => address.to_checksum(None),
        Err(_) => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const ACCOUNT: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn full_config() -> LedgerConfig {
        LedgerConfig {
            rpc_url: Some("http://127.0.0.1:8545".to_string()),
            chain_id: None,
            contract_address: Some(CONTRACT.to_string()),
            admin_secret_seed: Some(DEV_KEY.to_string()),
        }
    }

    #[tokio::test]
    async fn grant_without_seed_fails_before_network() {
        let client = LedgerClient::new(LedgerConfig {
            admin_secret_seed: None,
            ..full_config()
        });
        let err = client.grant_role(ACCOUNT, LedgerRole::Minter).await.unwrap_err();
        assert_eq!(err.to_string(), "ADMIN_SECRET_SEED not configured");
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn grant_without_rpc_url_fails() {
        let client = LedgerClient::new(LedgerConfig {
            rpc_url: None,
            ..full_config()
        });
        let err = client.grant_role(ACCOUNT, LedgerRole::Minter).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotConfigured(LEDGER_RPC_URL_ENV)));
    }

    #[tokio::test]
    async fn grant_without_contract_fails() {
        let client = LedgerClient::new(LedgerConfig {
            contract_address: None,
            ..full_config()
        });
        let err = client.grant_role(ACCOUNT, LedgerRole::Minter).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotConfigured(CONTRACT_ADDRESS_ENV)));
    }

    #[tokio::test]
    async fn grant_to_non_evm_wallet_is_unsupported() {
        let client = LedgerClient::new(full_config());
        let err = client.grant_role("GABC", LedgerRole::Minter).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnsupportedWallet(_)));
        assert_eq!(err.to_string(), "Wallet GABC is not an EVM account");

        let err = client.has_role("GABC", LedgerRole::Minter).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnsupportedWallet(_)));
    }

    #[tokio::test]
    async fn bad_contract_address_is_invalid_address() {
        let client = LedgerClient::new(LedgerConfig {
            contract_address: Some("0x1234".to_string()),
            ..full_config()
        });
        let err = client.has_role(ACCOUNT, LedgerRole::Minter).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAddress(_)));
    }

    #[test]
    fn canonical_wallet_folds_address_spellings() {
        let lower = ACCOUNT.to_lowercase();
        let spaced = format!(" {ACCOUNT} ");
        assert_eq!(canonical_wallet(ACCOUNT), ACCOUNT);
        assert_eq!(canonical_wallet(&lower), ACCOUNT);
        assert_eq!(canonical_wallet(&spaced), ACCOUNT);
        assert_eq!(canonical_wallet(&lower[2..]), ACCOUNT);
    }

    #[test]
    fn canonical_wallet_keeps_other_strings() {
        assert_eq!(canonical_wallet("GABC"), "GABC");
        assert_eq!(canonical_wallet("  GABC "), "GABC");
        assert_eq!(canonical_wallet("0xabc"), "0xabc");
        assert_eq!(canonical_wallet("   "), "");
    }

    #[tokio::test]
    async fn has_role_validates_inputs() {
        let client = LedgerClient::new(LedgerConfig {
            rpc_url: Some("not a url".to_string()),
            ..full_config()
        });
        let err = client.has_role(ACCOUNT, LedgerRole::Minter).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRpcUrl(_)));
    }

    #[test]
    fn fully_configured_client() {
        assert!(LedgerClient::new(full_config()).is_configured());
    }

    #[test]
    fn parse_address_accepts_checksummed_and_lowercase() {
        assert!(parse_address(ACCOUNT).is_ok());
        assert!(parse_address(&ACCOUNT.to_lowercase()).is_ok());
        assert!(parse_address("0x1234").is_err());
    }
}
