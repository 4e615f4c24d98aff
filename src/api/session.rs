// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{extract::State, Json};

use crate::{
    auth::{verify_password, AuthError},
    error::{ApiError, ApiJson},
    models::{Account, LoginRequest, LoginResponse},
    state::AppState,
};

/// Returned for an unknown id and for a wrong password alike.
pub const LOGIN_FAILED: &str = "Incorrect Account ID or Password";

/// Exchange an account id and password for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Invalid request body"),
        (status = 403, description = "Incorrect Account ID or Password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let LoginRequest { id, password } = request;
    let account_id = id.clone();
    let padding = state.clone();

    let account = state
        .run_blocking(move |store| -> Result<_, ApiError> {
            let account = store.get_account_by_id(&id)?;
            check_credentials(account, &password, || padding.padding_hash()).map_err(ApiError::from)
        })
        .await??;

    let Some(account) = account else {
        tracing::warn!(account_id = %account_id, "Login failed");
        return Err(ApiError::forbidden(LOGIN_FAILED));
    };

    let token = state.tokens().issue(&account)?;
    tracing::info!(account_id = %account.id, "Login succeeded");

    Ok(Json(LoginResponse { token }))
}

/// Admit `account` only if `password` matches its hash.
///
/// A missing account is checked against the padding hash instead, so an
/// unknown id costs the same bcrypt work as a wrong password.
fn check_credentials<'a>(
    account: Option<Account>,
    password: &str,
    padding_hash: impl FnOnce() -> Result<&'a str, AuthError>,
) -> Result<Option<Account>, AuthError> {
    match account {
        Some(account) => Ok(verify_password(password, &account.credential_hash).then_some(account)),
        None => {
            verify_password(password, padding_hash()?);
            Ok(None)
        }
    }
}
