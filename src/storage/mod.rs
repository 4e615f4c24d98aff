// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Account Store
//!
//! The account store is the only shared mutable resource in the service.
//! Every balance change, account creation, and deletion goes through the
//! [`AccountStore`] trait, and every multi-row change is committed as a
//! single transaction.
//!
//! ## Implementations
//!
//! - [`RedbAccountStore`] - embedded redb database (pure Rust, ACID)

pub mod redb_store;

pub use redb_store::RedbAccountStore;

use crate::models::Account;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("account already exists: {0}")]
    AlreadyExists(String),

    #[error("insufficient funds in account {number}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        number: i64,
        balance: i64,
        requested: i64,
    },

    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("source and destination are the same account: {0}")]
    SameAccount(i64),

    #[error("balance overflow on account {0}")]
    BalanceOverflow(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable repository of accounts, keyed by id and by account number.
pub trait AccountStore: Send + Sync {
    /// Insert a new account.
    ///
    /// # Errors
    /// `StoreError::AlreadyExists` if the id or the number is already taken.
    fn create_account(&self, account: &Account) -> StoreResult<()>;

    fn get_account_by_id(&self, id: &str) -> StoreResult<Option<Account>>;

    fn get_account_by_number(&self, number: i64) -> StoreResult<Option<Account>>;

    /// Remove an account. Returns `false` when no such account existed.
    fn delete_account(&self, id: &str) -> StoreResult<bool>;

    /// Every stored account. Not exposed over HTTP.
    fn list_accounts(&self) -> StoreResult<Vec<Account>>;

    /// Credit `amount` to a single account and return the updated record.
    /// Operator and test seeding only; no route calls it.
    fn deposit(&self, id: &str, amount: i64) -> StoreResult<Account>;

    /// Debit `from_number` and credit `to_number` by `amount` in one commit.
    ///
    /// Lookup, funds check, debit and credit all happen inside the same
    /// write transaction. On any error nothing is applied.
    fn atomic_adjust_balances(&self, from_number: i64, to_number: i64, amount: i64)
        -> StoreResult<()>;

    /// Verify the store is reachable.
    fn health_check(&self) -> StoreResult<()>;
}
