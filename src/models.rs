// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the persisted [`Account`] record and the request and
//! response structures used by the REST API. Wire types derive `ToSchema`
//! for OpenAPI documentation.
//!
//! ## Identifiers
//!
//! - `id` - short opaque string used in URLs and for ownership checks
//! - `number` - numeric address used to route transfers
//!
//! The stored credential hash lives only on [`Account`] and is never part of
//! any response type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Account Record
// =============================================================================

/// A ledger account as persisted by the account store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Unique identifier, assigned at creation and never reassigned.
    pub id: String,
    /// Unique transfer address.
    pub number: i64,
    pub first_name: String,
    pub last_name: String,
    /// Salted bcrypt hash of the owner's password.
    #[serde(rename = "password")]
    pub credential_hash: String,
    /// Balance in the smallest currency unit. Never negative once committed.
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// Account as returned to its owner (never includes the credential hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: String,
    pub number: i64,
    pub first_name: String,
    pub last_name: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            number: account.number,
            first_name: account.first_name,
            last_name: account.last_name,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

// =============================================================================
// Session Models
// =============================================================================

/// Request to log in as an account owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account ID returned at creation.
    pub id: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token, valid for 24 hours by default.
    pub token: String,
}

// =============================================================================
// Account Lifecycle Models
// =============================================================================

/// Request to open a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Response after creating an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAccountResponse {
    pub id: String,
}

/// Response after deleting an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteAccountResponse {
    pub id: String,
}

// =============================================================================
// Transfer Models
// =============================================================================

/// Request to move funds from the caller's account to another account.
///
/// The source account is the one the bearer token was issued for.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub to_account_number: i64,
    pub amount: i64,
}

/// Echo of a committed transfer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TransferResponse {
    pub from_account_number: i64,
    pub to_account_number: i64,
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            id: "26abcdefgh".to_string(),
            number: 1234567890,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            credential_hash: "$2b$04$hash".to_string(),
            balance: 42,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn account_persists_hash_under_password_field() {
        let json = serde_json::to_value(sample_account()).unwrap();
        assert_eq!(json["password"], "$2b$04$hash");
        assert!(json.get("credential_hash").is_none());
    }

    #[test]
    fn account_response_omits_credential_hash() {
        let response: AccountResponse = sample_account().into();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], "26abcdefgh");
        assert_eq!(json["number"], 1234567890);
        assert_eq!(json["balance"], 42);
        assert!(json.get("password").is_none());
    }

    #[test]
    fn transfer_request_uses_wire_field_names() {
        let request: TransferRequest =
            serde_json::from_str(r#"{"to_account_number":555,"amount":100}"#).unwrap();
        assert_eq!(request.to_account_number, 555);
        assert_eq!(request.amount, 100);
    }
}
