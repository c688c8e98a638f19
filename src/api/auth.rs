// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup and login endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    auth::{AuthError, SessionClaims},
    blockchain::canonical_wallet,
    error::ApiError,
    models::{non_empty, ErrorResponse, LoginRequest, SignupRequest, TokenResponse},
    state::AppState,
    storage::{UserRecord, UserStoreError},
};

const MISSING_FIELDS: &str = "Missing fields";
const ALREADY_EXISTS: &str = "User or wallet already exists";

fn store_error(e: UserStoreError) -> ApiError {
    match e {
        UserStoreError::Conflict => ApiError::conflict(ALREADY_EXISTS),
        other => {
            tracing::error!(error = %other, "User store operation failed");
            ApiError::internal(other.to_string())
        }
    }
}

fn issue_token(state: &AppState, claims: &SessionClaims) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.tokens.issue(claims).map_err(|e| {
        tracing::error!(error = %e, "Token signing failed");
        ApiError::internal(e.to_string())
    })?;
    Ok(Json(TokenResponse { token }))
}

/// Create an account and return a session token.
///
/// Every field is required and `accepted` must be `true`. Usernames and
/// wallets are each unique across all accounts; wallets are compared in
/// canonical form, so two spellings of one ledger account collide.
#[utoipa::path(
    post,
    path = "/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 409, description = "Username or wallet already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = payload?;

    let (Some(username), Some(password), Some(wallet), Some(true)) = (
        non_empty(request.username),
        non_empty(request.password),
        non_empty(request.wallet.as_deref().map(canonical_wallet)),
        request.accepted,
    ) else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };

    let db = state.users.get().await.map_err(store_error)?;

    // Cheap pre-check before paying for the hash; insert re-checks atomically
    if db.exists(&username, &wallet).map_err(store_error)? {
        tracing::info!(username = %username, "Signup rejected: username or wallet taken");
        return Err(ApiError::conflict(ALREADY_EXISTS));
    }

    let password_hash = state.passwords.hash(&password).await.map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal(e.to_string())
    })?;

    let record = UserRecord::new_verified(username, wallet, password_hash);
    db.insert(&record).map_err(store_error)?;

    tracing::info!(username = %record.username, user_id = %record.id, "User signed up");

    issue_token(&state, &SessionClaims::new(record.username, record.wallet))
}

/// Exchange a username and password for a session token.
///
/// Unknown usernames and wrong passwords are indistinguishable.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Missing fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = payload?;

    let (Some(username), Some(password)) = (non_empty(request.username), non_empty(request.password))
    else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };

    let db = state.users.get().await.map_err(store_error)?;

    let Some(record) = db.find_by_username(&username).map_err(store_error)? else {
        // Same bcrypt work as a wrong password
        if let Err(e) = state.passwords.verify_absent(&password).await {
            tracing::warn!(error = %e, "Dummy password verification failed");
        }
        tracing::info!("Login failed");
        return Err(AuthError::InvalidCredentials.into());
    };

    let matches = state
        .passwords
        .verify(&password, &record.password_hash)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification failed");
            ApiError::internal(e.to_string())
        })?;

    if !matches {
        tracing::info!("Login failed");
        return Err(AuthError::InvalidCredentials.into());
    }

    tracing::info!(username = %record.username, "User logged in");

    issue_token(&state, &SessionClaims::new(record.username, record.wallet))
}
