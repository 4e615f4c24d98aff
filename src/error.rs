// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::ledger::TransferError;
use crate::storage::StoreError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Generic 500. Details belong in the logs, not the response.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AccountNotFound(_) => ApiError::not_found("Account not found"),
            StoreError::InsufficientFunds { .. } => ApiError::unprocessable("Insufficient funds"),
            StoreError::InvalidAmount(_) => ApiError::bad_request("Amount must be positive"),
            StoreError::SameAccount(_) => {
                ApiError::bad_request("Cannot transfer to the same account")
            }
            StoreError::BalanceOverflow(_) => ApiError::unprocessable("Balance limit exceeded"),
            StoreError::AlreadyExists(_) => ApiError::conflict("Account already exists"),
            other => {
                tracing::error!(error = %other, "Account store failure");
                ApiError::internal()
            }
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::InvalidAmount(_) => ApiError::bad_request("Amount must be positive"),
            TransferError::SameAccount => {
                ApiError::bad_request("Cannot transfer to the same account")
            }
            TransferError::AccountNotFound(_) => ApiError::not_found("Account not found"),
            TransferError::InsufficientFunds => ApiError::unprocessable("Insufficient funds"),
            TransferError::Store(inner) => inner.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "Authentication failed internally");
                ApiError::internal()
            }
            other => {
                tracing::warn!(reason = other.reason(), "Permission denied");
                ApiError::new(StatusCode::UNAUTHORIZED, crate::auth::error::PERMISSION_DENIED)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::bad_request("Invalid request body")
    }
}

/// `Json` extractor whose rejection is an [`ApiError`], so malformed bodies
/// get the same `{"error": ...}` envelope as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
