// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger types and constants.

use alloy::primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ledger connection settings.
///
/// Every field is optional at startup; a missing value only fails the
/// requests that need it.
#[derive(Clone, Default)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: Option<String>,
    /// Expected chain ID; checked against the node before signing
    pub chain_id: Option<u64>,
    /// Deployed access-control contract address
    pub contract_address: Option<String>,
    /// Hex-encoded private key of the administrative signer
    pub admin_secret_seed: Option<String>,
}

impl LedgerConfig {
    /// Whether all settings needed for a grant are present.
    pub fn is_complete(&self) -> bool {
        self.rpc_url.is_some() && self.contract_address.is_some() && self.admin_secret_seed.is_some()
    }
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("contract_address", &self.contract_address)
            .field(
                "admin_secret_seed",
                &self.admin_secret_seed.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Contract roles this service can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LedgerRole {
    /// May mint product NFTs
    Minter,
}

impl LedgerRole {
    /// Role name as used by the contract.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerRole::Minter => "MINTER",
        }
    }

    /// On-chain role identifier: `keccak256(name)`.
    pub fn id(&self) -> B256 {
        keccak256(self.name().as_bytes())
    }
}

impl std::fmt::Display for LedgerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a confirmed role-grant transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantReceipt {
    /// Transaction hash (0x-prefixed hex)
    pub tx_hash: String,
    /// Block that included the transaction, when the node reports it
    pub block_number: Option<u64>,
}
