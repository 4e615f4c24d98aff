// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuing and validation.
//!
//! Tokens are HMAC-signed JWTs keyed by the process-wide signing secret.
//! Validity is a pure function of signature and expiry: there is no session
//! table and no revocation list.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::{claims::AccountClaims, AuthError};
use crate::config::SigningSecret;
use crate::models::Account;

/// Algorithm used for newly issued tokens.
const ISSUE_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted on validation. Anything else, including unsigned
/// tokens, is rejected.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Issuer and validator sharing one signing secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &SigningSecret, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(ISSUE_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a token for an account that has passed credential verification.
    pub fn issue(&self, account: &Account) -> Result<String, AuthError> {
        self.issue_at(account, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, account: &Account, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = AccountClaims {
            account_id: account.id.clone(),
            account_number: account.number,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(ISSUE_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature, algorithm family and expiry, and decode the claims.
    pub fn validate(&self, token: &str) -> Result<AccountClaims, AuthError> {
        let data = decode::<AccountClaims>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => AuthError::UnexpectedAlgorithm,
                _ => AuthError::MalformedToken,
            },
        )?;

        if data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(data.claims)
    }
}
