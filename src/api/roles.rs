// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contract role endpoints.
//!
//! Both endpoints act on the wallet of a re-validated user record, never on
//! the token claims alone. A grant is a fresh ledger transaction on every
//! call; if the outcome is uncertain, `GET /roles/minter` reports the
//! current on-chain state.

use axum::{extract::State, Json};

use crate::{
    auth::VerifiedUser,
    blockchain::{LedgerError, LedgerRole},
    error::ApiError,
    models::{ErrorResponse, GrantMinterResponse, RoleStatusResponse},
    state::AppState,
};

fn ledger_error(e: LedgerError) -> ApiError {
    ApiError::internal(e.to_string())
}

/// Grant the MINTER role to the caller's wallet.
///
/// The transaction is signed with the administrative key and the response
/// is sent once the ledger has confirmed it.
#[utoipa::path(
    post,
    path = "/roles/grant-minter",
    tag = "Roles",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Role granted", body = GrantMinterResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "User not found or not verified", body = ErrorResponse),
        (status = 500, description = "Ledger submission or configuration error", body = ErrorResponse)
    )
)]
pub async fn grant_minter(
    State(state): State<AppState>,
    VerifiedUser { record, .. }: VerifiedUser,
) -> Result<Json<GrantMinterResponse>, ApiError> {
    let role = LedgerRole::Minter;

    let receipt = state
        .ledger
        .grant_role(&record.wallet, role)
        .await
        .map_err(|e| {
            tracing::error!(
                username = %record.username,
                wallet = %record.wallet,
                error = %e,
                "grant-minter failed"
            );
            ledger_error(e)
        })?;

    tracing::info!(
        username = %record.username,
        wallet = %record.wallet,
        tx_hash = %receipt.tx_hash,
        block_number = ?receipt.block_number,
        "Minter role granted"
    );

    Ok(Json(GrantMinterResponse {
        ok: true,
        tx: receipt.tx_hash,
    }))
}

/// Report whether the caller's wallet currently holds the MINTER role.
#[utoipa::path(
    get,
    path = "/roles/minter",
    tag = "Roles",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current role status", body = RoleStatusResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "User not found or not verified", body = ErrorResponse),
        (status = 500, description = "Ledger query error", body = ErrorResponse)
    )
)]
pub async fn minter_status(
    State(state): State<AppState>,
    VerifiedUser { record, .. }: VerifiedUser,
) -> Result<Json<RoleStatusResponse>, ApiError> {
    let role = LedgerRole::Minter;

    let granted = state
        .ledger
        .has_role(&record.wallet, role)
        .await
        .map_err(|e| {
            tracing::warn!(wallet = %record.wallet, error = %e, "Role status query failed");
            ledger_error(e)
        })?;

    Ok(Json(RoleStatusResponse {
        wallet: record.wallet,
        role,
        granted,
    }))
}
