// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for token-bearing requests.
//!
//! ```rust,ignore
//! async fn get_account(AccountOwner(account): AccountOwner) -> Json<AccountResponse> {
//!     // the token in the request owns `account`
//! }
//! ```
//!
//! Every extractor runs per request. Nothing is cached between requests, so a
//! deleted account stops authorizing immediately.

use axum::{
    extract::{FromRequestParts, Path},
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AccountClaims, AuthError};
use crate::models::Account;
use crate::state::AppState;

/// Raw token string taken from the `Authorization` header.
///
/// Both `Bearer <token>` and the bare token are accepted. The scheme name is
/// matched case-insensitively.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?
            .trim();

        let token = match header.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            None if header.eq_ignore_ascii_case("bearer") => "",
            _ => header,
        };
        if token.is_empty() {
            return Err(AuthError::InvalidAuthHeader);
        }

        Ok(BearerToken(token.to_string()))
    }
}

/// A validated token whose account still exists under the same number.
///
/// Used by routes that act on "my account" without naming it in the path.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub claims: AccountClaims,
    pub account: Account,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let claims = state.tokens().validate(&token)?;

        let account = lookup(state, &claims.account_id).await?;
        if account.number != claims.account_number {
            return Err(AuthError::OwnershipMismatch);
        }

        Ok(Authenticated { claims, account })
    }
}

/// Authorization guard for `/accounts/{id}` routes.
///
/// Admits the request only when the token is valid, the path account exists
/// and the token's account number equals that account's number.
#[derive(Debug, Clone)]
pub struct AccountOwner(pub Account);

impl FromRequestParts<AppState> for AccountOwner {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let claims = state.tokens().validate(&token)?;

        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthError::UnknownAccount)?;

        let account = lookup(state, &id).await?;
        if account.number != claims.account_number {
            tracing::warn!(
                account_id = %id,
                token_account = %claims.account_id,
                "Token does not own target account"
            );
            return Err(AuthError::OwnershipMismatch);
        }

        Ok(AccountOwner(account))
    }
}

async fn lookup(state: &AppState, id: &str) -> Result<Account, AuthError> {
    let id = id.to_string();
    state
        .run_blocking(move |store| store.get_account_by_id(&id))
        .await
        .map_err(|_| AuthError::Internal("account lookup task failed".to_string()))?
        .map_err(|e| AuthError::Internal(format!("account lookup failed: {e}")))?
        .ok_or(AuthError::UnknownAccount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::Request;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    use crate::auth::TokenKeys;
    use crate::config::SigningSecret;
    use crate::storage::{AccountStore, RedbAccountStore};

    const SECRET: &str = "extractor-test-secret-0123456789abcdef";

    fn account(id: &str, number: i64) -> Account {
        Account {
            id: id.to_string(),
            number,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            credential_hash: "hash".to_string(),
            balance: 0,
            created_at: Utc::now(),
        }
    }

    fn create_test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = RedbAccountStore::open(&temp_dir.path().join("ledger.redb")).unwrap();
        store.create_account(&account("26alice001", 1111111111)).unwrap();
        store.create_account(&account("26bobby002", 2222222222)).unwrap();

        let keys = TokenKeys::new(&SigningSecret::new(SECRET).unwrap(), 3600);
        (AppState::new(Arc::new(store), keys, 4), temp_dir)
    }

    fn parts(uri: &str, authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    /// Path parameters are only populated by the router, so the guard is
    /// exercised through a one-route router.
    async fn guard_status(state: AppState, uri: &str, authorization: Option<&str>) -> u16 {
        use axum::{body::Body, routing::get, Router};
        use tower::ServiceExt;

        let app = Router::new()
            .route(
                "/accounts/{id}",
                get(|AccountOwner(account): AccountOwner| async move { account.id }),
            )
            .with_state(state);

        let mut request = Request::builder().uri(uri);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status().as_u16()
    }

    #[tokio::test]
    async fn bearer_token_requires_header() {
        let mut parts = parts("/test", None);
        let result = BearerToken::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn bearer_token_accepts_prefixed_and_raw() {
        let mut prefixed = parts("/test", Some("Bearer abc.def.ghi"));
        let BearerToken(token) = BearerToken::from_request_parts(&mut prefixed, &()).await.unwrap();
        assert_eq!(token, "abc.def.ghi");

        let mut raw = parts("/test", Some("abc.def.ghi"));
        let BearerToken(token) = BearerToken::from_request_parts(&mut raw, &()).await.unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[tokio::test]
    async fn bearer_scheme_is_case_insensitive() {
        for header in ["bearer abc.def.ghi", "BEARER abc.def.ghi", "bEaReR  abc.def.ghi"] {
            let mut parts = parts("/test", Some(header));
            let BearerToken(token) = BearerToken::from_request_parts(&mut parts, &())
                .await
                .unwrap();
            assert_eq!(token, "abc.def.ghi", "header {header:?}");
        }

        let mut blank = parts("/test", Some("bearer"));
        let result = BearerToken::from_request_parts(&mut blank, &()).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn bearer_token_rejects_blank() {
        let mut parts = parts("/test", Some("Bearer   "));
        let result = BearerToken::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn authenticated_resolves_token_account() {
        let (state, _temp_dir) = create_test_state();
        let alice = state.store().get_account_by_id("26alice001").unwrap().unwrap();
        let token = state.tokens().issue(&alice).unwrap();

        let mut parts = parts("/accounts/transfer", Some(&format!("Bearer {token}")));
        let auth = Authenticated::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(auth.account.id, "26alice001");
        assert_eq!(auth.claims.account_number, 1111111111);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn concurrent_lookups_resolve_on_blocking_pool() {
        let (state, _temp_dir) = create_test_state();
        let alice = state.store().get_account_by_id("26alice001").unwrap().unwrap();
        let token = format!("Bearer {}", state.tokens().issue(&alice).unwrap());

        let guards: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                let token = token.clone();
                tokio::spawn(async move {
                    let mut parts = parts("/accounts/transfer", Some(&token));
                    Authenticated::from_request_parts(&mut parts, &state).await
                })
            })
            .collect();

        for guard in guards {
            let auth = guard.await.unwrap().unwrap();
            assert_eq!(auth.account.number, 1111111111);
        }
    }

    #[tokio::test]
    async fn authenticated_rejects_deleted_account() {
        let (state, _temp_dir) = create_test_state();
        let alice = state.store().get_account_by_id("26alice001").unwrap().unwrap();
        let token = state.tokens().issue(&alice).unwrap();
        state.store().delete_account("26alice001").unwrap();

        let mut parts = parts("/accounts/transfer", Some(&token));
        let result = Authenticated::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::UnknownAccount)));
    }

    #[tokio::test]
    async fn authenticated_rejects_expired_token() {
        let (state, _temp_dir) = create_test_state();
        let alice = state.store().get_account_by_id("26alice001").unwrap().unwrap();
        let token = state
            .tokens()
            .issue_at(&alice, Utc::now() - Duration::hours(2))
            .unwrap();

        let mut parts = parts("/accounts/transfer", Some(&token));
        let result = Authenticated::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn owner_guard_admits_matching_token() {
        let (state, _temp_dir) = create_test_state();
        let alice = state.store().get_account_by_id("26alice001").unwrap().unwrap();
        let token = state.tokens().issue(&alice).unwrap();

        let status = guard_status(state, "/accounts/26alice001", Some(&token)).await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn owner_guard_rejects_other_account() {
        let (state, _temp_dir) = create_test_state();
        let alice = state.store().get_account_by_id("26alice001").unwrap().unwrap();
        let token = state.tokens().issue(&alice).unwrap();

        let status = guard_status(state, "/accounts/26bobby002", Some(&token)).await;
        assert_eq!(status, 401);
    }

    #[tokio::test]
    async fn owner_guard_rejects_unknown_account_and_missing_token() {
        let (state, _temp_dir) = create_test_state();
        let alice = state.store().get_account_by_id("26alice001").unwrap().unwrap();
        let token = state.tokens().issue(&alice).unwrap();

        let status = guard_status(state.clone(), "/accounts/26nobody00", Some(&token)).await;
        assert_eq!(status, 401);

        let status = guard_status(state, "/accounts/26alice001", None).await;
        assert_eq!(status, 401);
    }
}
