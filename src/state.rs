// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::{Arc, OnceLock};

use crate::auth::{hash_password, AuthError, TokenKeys};
use crate::error::ApiError;
use crate::storage::AccountStore;

/// Shared, read-only handles passed to every request.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn AccountStore>,
    tokens: Arc<TokenKeys>,
    bcrypt_cost: u32,
    padding_hash: Arc<OnceLock<String>>,
}

/// Hashed once and verified against when a login names no account.
const PADDING_PASSWORD: &str = "ledger-login-padding";

impl AppState {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenKeys, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            bcrypt_cost,
            padding_hash: Arc::new(OnceLock::new()),
        }
    }

    pub fn store(&self) -> &dyn AccountStore {
        self.store.as_ref()
    }

    pub fn tokens(&self) -> &TokenKeys {
        &self.tokens
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// A bcrypt hash at the configured cost that no account owns.
    ///
    /// Blocking on first use. Call from the blocking pool.
    pub fn padding_hash(&self) -> Result<&str, AuthError> {
        if let Some(hash) = self.padding_hash.get() {
            return Ok(hash.as_str());
        }
        let hash = hash_password(PADDING_PASSWORD, self.bcrypt_cost)?;
        Ok(self.padding_hash.get_or_init(|| hash).as_str())
    }

    /// Run store or hashing work on the blocking pool.
    ///
    /// The spawned task runs to completion even if the request future is
    /// dropped, so a commit in progress is never abandoned halfway.
    pub async fn run_blocking<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn AccountStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || work(store.as_ref()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Blocking task failed");
                ApiError::internal()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SigningSecret;
    use crate::storage::RedbAccountStore;

    #[test]
    fn padding_hash_costs_a_full_verification() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbAccountStore::open(&dir.path().join("ledger.redb")).unwrap();
        let keys = TokenKeys::new(
            &SigningSecret::new("state-test-secret-0123456789abcdef").unwrap(),
            3600,
        );
        let state = AppState::new(Arc::new(store), keys, 5);

        let hash = state.padding_hash().unwrap().to_string();
        assert!(hash.starts_with("$2b$05$"), "{hash}");
        assert!(!bcrypt::verify("hunter2", &hash).unwrap());

        let shared = state.clone();
        assert_eq!(shared.padding_hash().unwrap(), hash);
    }
}
