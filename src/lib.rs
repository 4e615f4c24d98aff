// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger Server - Account Ledger Service
//!
//! Accounts owned by password holders, signed bearer tokens proving that
//! ownership, and atomic transfers between accounts.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Password hashing, token issue/validation, request guards
//! - `ledger` - Account minting and the transfer engine
//! - `storage` - Account store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod state;
pub mod storage;
