// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer endpoint.
//!
//! The source account is always the one the bearer token was issued for;
//! the body only names the destination.

use axum::{extract::State, Json};

use crate::{
    auth::Authenticated,
    error::{ApiError, ApiJson},
    ledger::{TransferEngine, TransferIntent},
    models::{TransferRequest, TransferResponse},
    state::AppState,
};

/// Move funds from the caller's account to another account number.
#[utoipa::path(
    post,
    path = "/accounts/transfer",
    tag = "Transfers",
    security(("bearer_auth" = [])),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = TransferResponse),
        (status = 400, description = "Invalid amount or same account"),
        (status = 401, description = "Permission Denied"),
        (status = 404, description = "Destination account not found"),
        (status = 422, description = "Insufficient funds"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn transfer(
    State(state): State<AppState>,
    auth: Authenticated,
    ApiJson(request): ApiJson<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let intent = TransferIntent {
        from_number: auth.account.number,
        to_number: request.to_account_number,
        amount: request.amount,
    };

    let receipt = state
        .run_blocking(move |store| TransferEngine::execute(store, intent))
        .await??;

    Ok(Json(TransferResponse {
        from_account_number: receipt.intent.from_number,
        to_account_number: receipt.intent.to_number,
        amount: receipt.intent.amount,
    }))
}
