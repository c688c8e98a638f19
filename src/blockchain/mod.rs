// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger integration module.
//!
//! This module provides functionality for:
//! - Building the administrative signer from its seed
//! - Granting and querying contract roles (`AccessControl`)
//! - Awaiting transaction receipts

pub mod access_control;
pub mod client;
pub mod signing;
pub mod types;

pub use client::{canonical_wallet, LedgerClient, LedgerError, RoleGranter};
pub use types::*;
