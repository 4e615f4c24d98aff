// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential verification and bearer tokens for the ledger API.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{id, password}` to `/login`
//! 2. Server verifies the bcrypt hash and issues an HMAC-signed token
//!    carrying the account id and number
//! 3. Client sends `Authorization: Bearer <token>` (or the bare token)
//! 4. Extractors validate the token on every request and, for
//!    `/accounts/{id}` routes, check that its account number matches the
//!    target account
//!
//! ## Security
//!
//! - Tokens expire after the configured TTL with zero clock leeway
//! - Only HMAC algorithms are accepted; `none` and asymmetric algorithms fail
//! - Every rejection looks the same to clients

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod token;

pub use claims::AccountClaims;
pub use error::AuthError;
pub use extractor::{AccountOwner, Authenticated, BearerToken};
pub use password::{hash_password, verify_password};
pub use token::TokenKeys;
