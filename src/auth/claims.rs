// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims.

use serde::{Deserialize, Serialize};

/// Claims carried by a ledger bearer token.
///
/// Every field is required; a token missing any of them fails to decode and
/// is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    /// Account ID the token was issued for
    #[serde(rename = "id")]
    pub account_id: String,

    /// Account number the token was issued for
    #[serde(rename = "number")]
    pub account_number: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// Per-token nonce
    pub jti: String,
}
