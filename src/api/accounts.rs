// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account lifecycle API endpoints.
//!
//! Creation is open. Every route under `/accounts/{id}` goes through the
//! [`AccountOwner`] guard, so the bearer token must belong to the account
//! named in the path.

use axum::{extract::State, Json};

use crate::{
    auth::{hash_password, AccountOwner},
    error::{ApiError, ApiJson},
    ledger::new_account,
    models::{
        Account, AccountResponse, CreateAccountRequest, CreateAccountResponse,
        DeleteAccountResponse,
    },
    state::AppState,
    storage::StoreError,
};

/// Attempts at drawing an unused id and number before giving up.
const MAX_CREATE_ATTEMPTS: usize = 5;

/// Open a new account with a zero balance.
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "Accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 200, description = "Account created", body = CreateAccountResponse),
        (status = 400, description = "Missing name or password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAccountRequest>,
) -> Result<Json<CreateAccountResponse>, ApiError> {
    let CreateAccountRequest {
        first_name,
        last_name,
        password,
    } = request;

    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(ApiError::bad_request("First and last name are required"));
    }
    if password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }

    let cost = state.bcrypt_cost();
    let account = state
        .run_blocking(move |store| -> Result<Account, ApiError> {
            let hash = hash_password(&password, cost)?;

            for _ in 0..MAX_CREATE_ATTEMPTS {
                let account = new_account(&first_name, &last_name, hash.clone());
                match store.create_account(&account) {
                    Ok(()) => return Ok(account),
                    Err(StoreError::AlreadyExists(taken)) => {
                        tracing::debug!(taken = %taken, "Generated identifier collided, retrying");
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            tracing::error!("Could not allocate an unused account id and number");
            Err(ApiError::internal())
        })
        .await??;

    tracing::info!(account_id = %account.id, "Account created");

    Ok(Json(CreateAccountResponse { id: account.id }))
}

/// Fetch the caller's own account.
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 401, description = "Permission Denied"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_account(AccountOwner(account): AccountOwner) -> Json<AccountResponse> {
    Json(AccountResponse::from(account))
}

/// Close the caller's own account.
#[utoipa::path(
    delete,
    path = "/accounts/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account deleted", body = DeleteAccountResponse),
        (status = 401, description = "Permission Denied"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_account(
    AccountOwner(account): AccountOwner,
    State(state): State<AppState>,
) -> Result<Json<DeleteAccountResponse>, ApiError> {
    let id = account.id;
    let target = id.clone();

    let removed = state
        .run_blocking(move |store| store.delete_account(&target))
        .await??;

    if removed {
        tracing::info!(account_id = %id, "Account deleted");
    } else {
        // Lost a race with another delete of the same account.
        tracing::debug!(account_id = %id, "Account already gone");
    }

    Ok(Json(DeleteAccountResponse { id }))
}
