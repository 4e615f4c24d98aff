// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AccountResponse, CreateAccountRequest, CreateAccountResponse, DeleteAccountResponse,
        LoginRequest, LoginResponse, TransferRequest, TransferResponse,
    },
    state::AppState,
};

pub mod accounts;
pub mod health;
pub mod session;
pub mod transfer;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/login", post(session::login))
        .route("/accounts", post(accounts::create_account))
        .route(
            "/accounts/transfer",
            post(transfer::transfer).put(transfer::transfer),
        )
        .route(
            "/accounts/{id}",
            get(accounts::get_account).delete(accounts::delete_account),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::login,
        accounts::create_account,
        accounts::get_account,
        accounts::delete_account,
        transfer::transfer,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            CreateAccountRequest,
            CreateAccountResponse,
            DeleteAccountResponse,
            AccountResponse,
            TransferRequest,
            TransferResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            health::ComponentStatus
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Session", description = "Login and token issuance"),
        (name = "Accounts", description = "Account lifecycle"),
        (name = "Transfers", description = "Moving funds between accounts"),
        (name = "Health", description = "Liveness and readiness checks")
    )
)]
struct ApiDoc;
