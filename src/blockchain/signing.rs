// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Administrative signer construction.
//!
//! The admin seed is a hex-encoded secp256k1 private key taken from the
//! environment. It signs role grants and is never returned to clients.

use alloy::{network::EthereumWallet, signers::local::PrivateKeySigner};

use super::client::LedgerError;

/// Create a signer from a hex private key (64 characters, `0x` prefix optional).
pub fn signer_from_seed(seed: &str) -> Result<PrivateKeySigner, LedgerError> {
    let trimmed = seed.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    let key_bytes = alloy::hex::decode(hex)
        .map_err(|e| LedgerError::InvalidAdminKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes).map_err(|e| LedgerError::InvalidAdminKey(e.to_string()))
}

/// Create a wallet (transaction signer set) from the admin seed.
pub fn wallet_from_seed(seed: &str) -> Result<(EthereumWallet, alloy::primitives::Address), LedgerError> {
    let signer = signer_from_seed(seed)?;
    let address = signer.address();
    Ok((EthereumWallet::from(signer), address))
}
