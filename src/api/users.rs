// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;

use crate::auth::{Auth, VerifiedToken};
use crate::models::{CurrentUserResponse, ErrorResponse};

impl From<VerifiedToken> for CurrentUserResponse {
    fn from(token: VerifiedToken) -> Self {
        Self {
            username: token.claims.subject,
            wallet: token.claims.wallet,
            expires_at: token.expires_at,
        }
    }
}

/// Get the identity carried by the presented session token.
///
/// Only the token is checked; use the role endpoints for actions that need
/// a current user record.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token identity", body = CurrentUserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    )
)]
pub async fn get_current_user(Auth(token): Auth) -> Json<CurrentUserResponse> {
    Json(token.into())
}
