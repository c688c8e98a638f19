// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::blockchain::LedgerRole;

/// Body of `POST /signup`.
///
/// Fields are optional at the serde level so that a missing field is
/// reported as `Missing fields` rather than a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Ledger address to associate with the account
    pub wallet: Option<String>,
    /// Must be `true`: the user accepted the terms of service
    pub accepted: Option<bool>,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Session token returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Result of a confirmed role grant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GrantMinterResponse {
    pub ok: bool,
    /// Transaction hash
    pub tx: String,
}

/// Current on-chain role status of the caller's wallet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleStatusResponse {
    pub wallet: String,
    pub role: LedgerRole,
    pub granted: bool,
}

/// Identity carried by the presented session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub username: String,
    pub wallet: String,
    /// Token expiry (Unix timestamp)
    pub expires_at: i64,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Treat absent and empty strings alike.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
