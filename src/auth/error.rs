// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! The variants record *why* a request was rejected so the reason can be
//! logged. Clients never see the reason: every rejection renders as the same
//! `401 {"error": "Permission Denied"}`, and internal failures as a generic
//! `500`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned for every authorization rejection.
pub const PERMISSION_DENIED: &str = "Permission Denied";

const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Header is not valid visible ASCII or is empty
    InvalidAuthHeader,
    /// Token is not a well-formed JWT or lacks required claims
    MalformedToken,
    /// Token signature does not match the signing secret
    InvalidSignature,
    /// Token was signed with an algorithm outside the HMAC family
    UnexpectedAlgorithm,
    /// Token `exp` has passed
    TokenExpired,
    /// The account the request targets (or the token names) does not exist
    UnknownAccount,
    /// The token's account number does not match the target account
    OwnershipMismatch,
    /// Signing failure or store unavailable
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Short machine-readable reason, for logs only.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::UnexpectedAlgorithm => "unexpected_algorithm",
            AuthError::TokenExpired => "token_expired",
            AuthError::UnknownAccount => "unknown_account",
            AuthError::OwnershipMismatch => "ownership_mismatch",
            AuthError::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => write!(f, "Invalid authorization header"),
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::UnexpectedAlgorithm => write!(f, "Token uses an unexpected algorithm"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::UnknownAccount => write!(f, "Account does not exist"),
            AuthError::OwnershipMismatch => write!(f, "Token does not own this account"),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AuthError::Internal(ref msg) => {
                tracing::error!(error = %msg, "Authentication failed internally");
                INTERNAL_ERROR
            }
            ref other => {
                tracing::warn!(reason = other.reason(), "Permission denied");
                PERMISSION_DENIED
            }
        };
        (status, Json(AuthErrorBody { error: message })).into_response()
    }
}
