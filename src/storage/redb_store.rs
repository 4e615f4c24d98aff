// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded account database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: account id → serialized [`Account`] (JSON bytes)
//! - `account_numbers`: account number → account id
//!
//! redb admits a single write transaction at a time, so two transfers that
//! race on the same source account are serialized by the database and the
//! second one sees the balance left by the first.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};

use super::{AccountStore, StoreError, StoreResult};
use crate::models::Account;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: account id → serialized Account (JSON bytes).
const ACCOUNTS: TableDefinition<&str, &[u8]> = TableDefinition::new("accounts");

/// Index: account number → account id.
const ACCOUNT_NUMBERS: TableDefinition<i64, &str> = TableDefinition::new("account_numbers");

fn decode(bytes: &[u8]) -> StoreResult<Account> {
    Ok(serde_json::from_slice(bytes)?)
}

// =============================================================================
// RedbAccountStore
// =============================================================================

/// Account store over a single redb database file.
pub struct RedbAccountStore {
    db: Database,
}

impl RedbAccountStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(ACCOUNT_NUMBERS)?;
        }
        write_txn.commit()?;

        tracing::info!(path = %path.display(), "Account database opened");
        Ok(Self { db })
    }

    /// Run `apply` inside one write transaction. Commits on `Ok`, aborts on `Err`.
    fn write<T>(&self, apply: impl FnOnce(&WriteTransaction) -> StoreResult<T>) -> StoreResult<T> {
        let write_txn = self.db.begin_write()?;
        match apply(&write_txn) {
            Ok(value) => {
                write_txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                write_txn.abort()?;
                Err(e)
            }
        }
    }
}

impl AccountStore for RedbAccountStore {
    fn create_account(&self, account: &Account) -> StoreResult<()> {
        let json = serde_json::to_vec(account)?;

        self.write(|txn| {
            let mut accounts = txn.open_table(ACCOUNTS)?;
            let mut numbers = txn.open_table(ACCOUNT_NUMBERS)?;

            if accounts.get(account.id.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("id {}", account.id)));
            }
            if numbers.get(account.number)?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "number {}",
                    account.number
                )));
            }

            accounts.insert(account.id.as_str(), json.as_slice())?;
            numbers.insert(account.number, account.id.as_str())?;
            Ok(())
        })
    }

    fn get_account_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn get_account_by_number(&self, number: i64) -> StoreResult<Option<Account>> {
        let read_txn = self.db.begin_read()?;
        let numbers = read_txn.open_table(ACCOUNT_NUMBERS)?;
        let accounts = read_txn.open_table(ACCOUNTS)?;

        let id = match numbers.get(number)? {
            Some(v) => v.value().to_string(),
            None => return Ok(None),
        };
        match accounts.get(id.as_str())? {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    fn delete_account(&self, id: &str) -> StoreResult<bool> {
        self.write(|txn| {
            let mut accounts = txn.open_table(ACCOUNTS)?;
            let mut numbers = txn.open_table(ACCOUNT_NUMBERS)?;

            let removed = accounts
                .remove(id)?
                .map(|value| decode(value.value()))
                .transpose()?;

            match removed {
                Some(account) => {
                    numbers.remove(account.number)?;
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;

        let mut accounts = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            accounts.push(decode(value.value())?);
        }
        Ok(accounts)
    }

    fn deposit(&self, id: &str, amount: i64) -> StoreResult<Account> {
        if amount <= 0 {
            return Err(StoreError::InvalidAmount(amount));
        }

        self.write(|txn| {
            let mut accounts = txn.open_table(ACCOUNTS)?;

            let mut account = accounts
                .get(id)?
                .map(|value| decode(value.value()))
                .transpose()?
                .ok_or_else(|| StoreError::AccountNotFound(id.to_string()))?;

            account.balance = account
                .balance
                .checked_add(amount)
                .ok_or_else(|| StoreError::BalanceOverflow(id.to_string()))?;

            let json = serde_json::to_vec(&account)?;
            accounts.insert(id, json.as_slice())?;
            Ok(account)
        })
    }

    fn atomic_adjust_balances(
        &self,
        from_number: i64,
        to_number: i64,
        amount: i64,
    ) -> StoreResult<()> {
        if amount <= 0 {
            return Err(StoreError::InvalidAmount(amount));
        }
        if from_number == to_number {
            return Err(StoreError::SameAccount(from_number));
        }

        self.write(|txn| {
            let numbers = txn.open_table(ACCOUNT_NUMBERS)?;
            let mut accounts = txn.open_table(ACCOUNTS)?;

            let lookup_id = |number: i64| -> StoreResult<String> {
                numbers
                    .get(number)?
                    .map(|v| v.value().to_string())
                    .ok_or_else(|| StoreError::AccountNotFound(number.to_string()))
            };

            let source_id = lookup_id(from_number)?;
            let mut source = accounts
                .get(source_id.as_str())?
                .map(|value| decode(value.value()))
                .transpose()?
                .ok_or_else(|| StoreError::AccountNotFound(from_number.to_string()))?;

            if source.balance < amount {
                return Err(StoreError::InsufficientFunds {
                    number: from_number,
                    balance: source.balance,
                    requested: amount,
                });
            }

            let dest_id = lookup_id(to_number)?;
            let mut dest = accounts
                .get(dest_id.as_str())?
                .map(|value| decode(value.value()))
                .transpose()?
                .ok_or_else(|| StoreError::AccountNotFound(to_number.to_string()))?;

            source.balance -= amount;
            dest.balance = dest
                .balance
                .checked_add(amount)
                .ok_or_else(|| StoreError::BalanceOverflow(dest.id.clone()))?;

            let source_json = serde_json::to_vec(&source)?;
            let dest_json = serde_json::to_vec(&dest)?;
            accounts.insert(source.id.as_str(), source_json.as_slice())?;
            accounts.insert(dest.id.as_str(), dest_json.as_slice())?;
            Ok(())
        })
    }

    fn health_check(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(ACCOUNTS)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
