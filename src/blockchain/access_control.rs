// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access-control contract interactions.

use alloy::{
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::TransactionReceipt,
    sol,
};

use super::client::LedgerError;

// Role management subset of OpenZeppelin's AccessControl
sol! {
    #[sol(rpc)]
    interface IAccessControl {
        function hasRole(bytes32 role, address account) external view returns (bool);
        function grantRole(bytes32 role, address account) external;
    }
}

/// Access-control contract wrapper.
pub struct AccessControlContract<P> {
    contract: IAccessControl::IAccessControlInstance<P>,
}

impl<P: Provider + Clone> AccessControlContract<P> {
    pub fn new(provider: &P, address: Address) -> Self {
        Self {
            contract: IAccessControl::new(address, provider.clone()),
        }
    }

    /// Whether `account` currently holds `role`.
    pub async fn has_role(&self, role: B256, account: Address) -> Result<bool, LedgerError> {
        self.contract
            .hasRole(role, account)
            .call()
            .await
            .map_err(|e| LedgerError::Contract(e.to_string()))
    }

    /// Submit `grantRole(role, account)` and wait for its receipt.
    ///
    /// The provider must carry a wallet; the call is signed by it.
    pub async fn grant_role(
        &self,
        role: B256,
        account: Address,
    ) -> Result<TransactionReceipt, LedgerError> {
        let pending = self
            .contract
            .grantRole(role, account)
            .send()
            .await
            .map_err(|e| LedgerError::Submission(e.to_string()))?;

        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, "Role grant submitted, awaiting receipt");

        pending
            .get_receipt()
            .await
            .map_err(|e| LedgerError::Confirmation(format!("{tx_hash}: {e}")))
    }
}
