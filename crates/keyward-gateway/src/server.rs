// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router assembly and the HTTP listener.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post, put};
use keyward_assistant::Assistant;
use keyward_auth::AccountService;
use keyward_core::{KeywardError, StorageAdapter};
use keyward_vault::VaultService;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::session::{CookieSettings, require_session};
use crate::{account, chatbot, health, passwords};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub vault: VaultService,
    pub storage: Arc<dyn StorageAdapter>,
    pub cookie: CookieSettings,
    pub assistant: Assistant,
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::get_health))
        .route("/api/auth/signup", post(account::signup))
        .route("/api/auth/verify", post(account::verify))
        .route("/api/auth/login", post(account::login))
        .route("/api/auth/forgot-password", post(account::forgot_password))
        .route("/api/auth/verify-reset-code", post(account::verify_reset_code))
        .route("/api/auth/reset-password", post(account::reset_password));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(account::logout))
        .route("/api/auth/status", get(account::status))
        .route(
            "/api/auth/me",
            put(account::update_me).delete(account::delete_me),
        )
        .route("/api/password", delete(passwords::delete_one))
        .route(
            "/api/password/all",
            get(passwords::list).delete(passwords::delete_all),
        )
        .route("/api/password/search", get(passwords::search))
        .route("/api/password/add", post(passwords::add))
        .route("/api/password/edit", put(passwords::edit))
        .route("/api/password/generate", post(passwords::generate))
        .route("/api/password/{site_name}/{email}", get(passwords::reveal))
        .route("/api/chatbot/message", post(chatbot::message))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn start_server<F>(
    host: &str,
    port: u16,
    state: AppState,
    shutdown: F,
) -> Result<(), KeywardError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| KeywardError::Internal(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("Keyward listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| KeywardError::Internal(format!("server error: {e}")))?;

    Ok(())
}
