// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger
//!
//! Business rules on top of the account store: how new accounts are minted
//! and how a transfer is validated and applied.
//!
//! The store owns atomicity. This module owns the rules that decide whether a
//! request is worth sending to the store at all, and how store failures are
//! reported back.

pub mod accounts;
pub mod transfer;

pub use accounts::new_account;
pub use transfer::{TransferEngine, TransferError, TransferIntent, TransferReceipt};
