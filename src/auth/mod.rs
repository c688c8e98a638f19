// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Username/password authentication with self-issued session tokens.
//!
//! ## Auth Flow
//!
//! 1. Client signs up or logs in with a username and password
//! 2. Server hashes/verifies the password (bcrypt) and issues an HS256 JWT
//!    carrying `sub` (username) and `wallet`
//! 3. Client sends `Authorization: Bearer <token>` on later requests
//! 4. Server:
//!    - Verifies signature and expiry (no database lookup)
//!    - For privileged actions, re-resolves `(sub, wallet)` against the
//!      credential store and requires a verified record
//!
//! ## Security
//!
//! - Unknown usernames and wrong passwords produce the same error
//! - Invalid, expired, and malformed tokens produce the same error
//! - Tokens are never revoked server-side; expiry is the only invalidation
//! - Token claims are hints: privileged decisions come from current store state

pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use extractor::{Auth, VerifiedUser};
pub use password::{PasswordError, PasswordHasher};
pub use token::{SessionClaims, TokenError, TokenRejected, TokenService, VerifiedToken};
