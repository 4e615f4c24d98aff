// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer engine.
//!
//! A transfer moves `amount` from one account number to another as a single
//! atomic unit. Either both balances change or neither does; the store's
//! write transaction is the unit of atomicity. The engine never retries: a
//! rejected transfer is reported and the client decides what to do.

use chrono::{DateTime, Utc};

use crate::storage::{AccountStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    #[error("cannot transfer to the same account")]
    SameAccount,

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::InvalidAmount(amount) => TransferError::InvalidAmount(amount),
            StoreError::SameAccount(_) => TransferError::SameAccount,
            StoreError::AccountNotFound(which) => TransferError::AccountNotFound(which),
            StoreError::InsufficientFunds { .. } => TransferError::InsufficientFunds,
            other => TransferError::Store(other),
        }
    }
}

/// A request to move funds between two account numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferIntent {
    pub from_number: i64,
    pub to_number: i64,
    pub amount: i64,
}

impl TransferIntent {
    /// Check the parts of a transfer that don't need the store.
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.amount <= 0 {
            return Err(TransferError::InvalidAmount(self.amount));
        }
        if self.from_number == self.to_number {
            return Err(TransferError::SameAccount);
        }
        Ok(())
    }
}

/// Proof that a transfer committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub intent: TransferIntent,
    pub completed_at: DateTime<Utc>,
}

pub struct TransferEngine;

impl TransferEngine {
    /// Validate and apply a transfer.
    ///
    /// # Errors
    /// Any error means no balance changed.
    pub fn execute(
        store: &dyn AccountStore,
        intent: TransferIntent,
    ) -> Result<TransferReceipt, TransferError> {
        if let Err(e) = intent.validate() {
            tracing::warn!(
                from = intent.from_number,
                to = intent.to_number,
                amount = intent.amount,
                error = %e,
                "Transfer rejected"
            );
            return Err(e);
        }

        match store.atomic_adjust_balances(intent.from_number, intent.to_number, intent.amount) {
            Ok(()) => {
                tracing::info!(
                    from = intent.from_number,
                    to = intent.to_number,
                    amount = intent.amount,
                    "Transfer committed"
                );
                Ok(TransferReceipt {
                    intent,
                    completed_at: Utc::now(),
                })
            }
            Err(e) => {
                let err = TransferError::from(e);
                match &err {
                    TransferError::Store(inner) => tracing::error!(
                        from = intent.from_number,
                        to = intent.to_number,
                        error = %inner,
                        "Transfer failed in store"
                    ),
                    other => tracing::warn!(
                        from = intent.from_number,
                        to = intent.to_number,
                        amount = intent.amount,
                        error = %other,
                        "Transfer rejected"
                    ),
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::models::Account;
    use crate::storage::{RedbAccountStore, StoreResult};

    /// Records balance adjustments without applying them.
    #[derive(Default)]
    struct CountingStore {
        adjust_calls: AtomicUsize,
    }

    impl CountingStore {
        fn adjust_calls(&self) -> usize {
            self.adjust_calls.load(Ordering::SeqCst)
        }
    }

    impl AccountStore for CountingStore {
        fn create_account(&self, _account: &Account) -> StoreResult<()> {
            unreachable!("transfers never create accounts")
        }

        fn get_account_by_id(&self, _id: &str) -> StoreResult<Option<Account>> {
            Ok(None)
        }

        fn get_account_by_number(&self, _number: i64) -> StoreResult<Option<Account>> {
            Ok(None)
        }

        fn delete_account(&self, _id: &str) -> StoreResult<bool> {
            unreachable!("transfers never delete accounts")
        }

        fn list_accounts(&self) -> StoreResult<Vec<Account>> {
            Ok(Vec::new())
        }

        fn deposit(&self, _id: &str, _amount: i64) -> StoreResult<Account> {
            unreachable!("transfers never deposit")
        }

        fn atomic_adjust_balances(&self, _from: i64, _to: i64, _amount: i64) -> StoreResult<()> {
            self.adjust_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn health_check(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    fn store_with(accounts: &[(&str, i64, i64)]) -> (RedbAccountStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbAccountStore::open(&dir.path().join("ledger.redb")).unwrap();
        for (id, number, balance) in accounts {
            store
                .create_account(&Account {
                    id: id.to_string(),
                    number: *number,
                    first_name: "Test".to_string(),
                    last_name: "Owner".to_string(),
                    credential_hash: "hash".to_string(),
                    balance: *balance,
                    created_at: Utc::now(),
                })
                .unwrap();
        }
        (store, dir)
    }

    fn balance(store: &RedbAccountStore, number: i64) -> i64 {
        store.get_account_by_number(number).unwrap().unwrap().balance
    }

    fn intent(from_number: i64, to_number: i64, amount: i64) -> TransferIntent {
        TransferIntent {
            from_number,
            to_number,
            amount,
        }
    }

    #[test]
    fn validate_rejects_non_positive_and_self() {
        assert!(matches!(
            intent(1, 2, 0).validate(),
            Err(TransferError::InvalidAmount(0))
        ));
        assert!(matches!(
            intent(1, 2, -5).validate(),
            Err(TransferError::InvalidAmount(-5))
        ));
        assert!(matches!(
            intent(1, 1, 10).validate(),
            Err(TransferError::SameAccount)
        ));
        assert!(intent(1, 2, 1).validate().is_ok());
    }

    #[test]
    fn execute_moves_funds() {
        let (store, _dir) = store_with(&[
            ("26aaaaaaaa", 1000000001, 500),
            ("26bbbbbbbb", 1000000002, 0),
        ]);

        let receipt = TransferEngine::execute(&store, intent(1000000001, 1000000002, 200)).unwrap();
        assert_eq!(receipt.intent.amount, 200);
        assert_eq!(balance(&store, 1000000001), 300);
        assert_eq!(balance(&store, 1000000002), 200);
    }

    #[test]
    fn overdraw_is_rejected_without_side_effects() {
        let (store, _dir) = store_with(&[
            ("26aaaaaaaa", 1000000001, 50),
            ("26bbbbbbbb", 1000000002, 0),
        ]);

        let result = TransferEngine::execute(&store, intent(1000000001, 1000000002, 100));
        assert!(matches!(result, Err(TransferError::InsufficientFunds)));
        assert_eq!(balance(&store, 1000000001), 50);
        assert_eq!(balance(&store, 1000000002), 0);
    }

    #[test]
    fn unknown_destination_is_not_found() {
        let (store, _dir) = store_with(&[("26aaaaaaaa", 1000000001, 50)]);

        let result = TransferEngine::execute(&store, intent(1000000001, 9999999999, 10));
        assert!(matches!(result, Err(TransferError::AccountNotFound(_))));
        assert_eq!(balance(&store, 1000000001), 50);
    }

    #[test]
    fn invalid_intent_never_reaches_store() {
        let store = CountingStore::default();

        let zero = TransferEngine::execute(&store, intent(1000000001, 1000000002, 0));
        assert!(matches!(zero, Err(TransferError::InvalidAmount(0))));

        let negative = TransferEngine::execute(&store, intent(1000000001, 1000000002, -1));
        assert!(matches!(negative, Err(TransferError::InvalidAmount(-1))));

        let same = TransferEngine::execute(&store, intent(1000000001, 1000000001, 10));
        assert!(matches!(same, Err(TransferError::SameAccount)));

        assert_eq!(store.adjust_calls(), 0);
    }

    #[test]
    fn valid_intent_adjusts_balances_once() {
        let store = CountingStore::default();

        TransferEngine::execute(&store, intent(1000000001, 1000000002, 10)).unwrap();
        assert_eq!(store.adjust_calls(), 1);
    }

    #[test]
    fn store_failures_are_wrapped() {
        let err = TransferError::from(StoreError::BalanceOverflow("x".into()));
        assert!(matches!(err, TransferError::Store(StoreError::BalanceOverflow(_))));
    }
}
