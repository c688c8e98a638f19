// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated requests.
//!
//! Use `Auth` when the token alone is enough, and `VerifiedUser` for
//! privileged actions that must be backed by a current, verified record:
//!
//! ```rust,ignore
//! async fn my_handler(VerifiedUser { record, .. }: VerifiedUser) -> impl IntoResponse {
//!     // record.wallet is the re-validated wallet
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, VerifiedToken};
use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::UserRecord;

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively. Anything else counts as no
/// token at all.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split(' ');
    let scheme = parts.next()?;
    let token = parts.next()?;
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Extractor for a request carrying a valid session token.
///
/// Only the signature and expiry are checked; the claims are not looked up
/// in the credential store.
pub struct Auth(pub VerifiedToken);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)?;

        let verified = state
            .tokens
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(Auth(verified))
    }
}

/// Extractor for privileged actions.
///
/// Requires a valid token AND a verified user record matching both the
/// token's subject and wallet at the time of the request.
pub struct VerifiedUser {
    pub record: UserRecord,
    pub token: VerifiedToken,
}

impl FromRequestParts<AppState> for VerifiedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(token) = Auth::from_request_parts(parts, state).await?;

        let db = state.users.get().await.map_err(|e| {
            tracing::error!(error = %e, "User database unavailable");
            ApiError::internal(e.to_string())
        })?;

        let record = db
            .find_verified(&token.claims.subject, &token.claims.wallet)
            .map_err(|e| {
                tracing::error!(error = %e, "User lookup failed");
                ApiError::internal(e.to_string())
            })?
            .ok_or_else(|| {
                tracing::info!(
                    username = %token.claims.subject,
                    "Token holder has no verified user record"
                );
                AuthError::NotVerified
            })?;

        Ok(VerifiedUser { record, token })
    }
}
