// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fermento Server - Auth Gateway and Minter Role Grants
//!
//! Users sign up and log in with a username, password and ledger wallet, and
//! receive a signed session token. A verified user can then ask the service
//! to grant their wallet the MINTER role on the product contract; the grant
//! is signed with an administrative key held only by the server.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Session tokens, password hashing and request extractors
//! - `blockchain` - EVM access-control contract client
//! - `storage` - Credential store (redb)

pub mod api;
pub mod auth;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;
