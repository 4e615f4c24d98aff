// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Minting new accounts.

use chrono::{Datelike, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::models::Account;

/// Length of the random part of an account id.
const ID_SUFFIX_LEN: usize = 8;

/// Smallest and largest account numbers handed out (always ten digits).
pub const MIN_ACCOUNT_NUMBER: i64 = 1_000_000_000;
pub const MAX_ACCOUNT_NUMBER: i64 = 9_999_999_999;

/// Build a fresh account with a zero balance.
///
/// Uniqueness of the id and number is not checked here; the store rejects
/// collisions and the caller generates again.
pub fn new_account(first_name: &str, last_name: &str, credential_hash: String) -> Account {
    Account {
        id: generate_id(),
        number: generate_number(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        credential_hash,
        balance: 0,
        created_at: Utc::now(),
    }
}

/// Two-digit year followed by eight lowercase alphanumerics, e.g. `26k3f9a0zq`.
pub fn generate_id() -> String {
    let year = Utc::now().year() % 100;
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{year:02}{suffix}")
}

pub fn generate_number() -> i64 {
    rand::thread_rng().gen_range(MIN_ACCOUNT_NUMBER..=MAX_ACCOUNT_NUMBER)
}
