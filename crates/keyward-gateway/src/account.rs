// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers under `/api/auth`.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use keyward_auth::{IssuedSession, RESET_REQUESTED_MESSAGE, SignupRequest};
use keyward_core::User;
use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ApiError;
use crate::response::{ApiData, ApiMessage, UserBody};
use crate::server::AppState;
use crate::session::CurrentUser;

// Missing string fields deserialize as empty so the services answer with a
// 400 validation message instead of a body rejection.

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SignupBody {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeBody {
    email: String,
    code: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailBody {
    email: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetBody {
    email: String,
    code: String,
    new_password: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateMeBody {
    name: Option<String>,
    password: Option<String>,
}

fn logged_in(
    state: &AppState,
    jar: CookieJar,
    status: StatusCode,
    message: &str,
    user: User,
    issued: IssuedSession,
) -> Response {
    let jar = state
        .cookie
        .issue(jar, &issued.token, issued.max_age_secs);
    let body = ApiData::ok(message, UserBody { user: user.into() });
    (status, jar, Json(body)).into_response()
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .accounts
        .signup(SignupRequest {
            name: body.name,
            email: body.email,
            password: SecretString::from(body.password),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::ok("verification code sent to your email")),
    ))
}

/// POST /api/auth/verify
pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CodeBody>,
) -> Result<Response, ApiError> {
    let (user, issued) = state.accounts.verify(&body.email, &body.code).await?;
    Ok(logged_in(
        &state,
        jar,
        StatusCode::CREATED,
        "account verified",
        user,
        issued,
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Result<Response, ApiError> {
    let (user, issued) = state
        .accounts
        .login(&body.email, SecretString::from(body.password))
        .await?;
    Ok(logged_in(&state, jar, StatusCode::OK, "logged in", user, issued))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = state.cookie.token(&jar) {
        state.accounts.logout(token).await?;
    }
    let jar = state.cookie.clear(jar);
    Ok((jar, Json(ApiMessage::ok("logged out"))))
}

/// GET /api/auth/status
pub async fn status(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.accounts.status(&user.id).await?;
    Ok(Json(ApiData::ok("authenticated", UserBody { user: user.into() })))
}

/// PUT /api/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<UpdateMeBody>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .accounts
        .update_account(&user.id, body.name, body.password.map(SecretString::from))
        .await?;
    Ok(Json(ApiData::ok(
        "account updated",
        UserBody {
            user: updated.into(),
        },
    )))
}

/// DELETE /api/auth/me
pub async fn delete_me(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    state.accounts.delete_account(&user.id).await?;
    let jar = state.cookie.clear(jar);
    Ok((jar, Json(ApiMessage::ok("account deleted"))))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<EmailBody>,
) -> Result<impl IntoResponse, ApiError> {
    state.accounts.forgot_password(&body.email).await?;
    Ok(Json(ApiMessage::ok(RESET_REQUESTED_MESSAGE)))
}

/// POST /api/auth/verify-reset-code
pub async fn verify_reset_code(
    State(state): State<AppState>,
    Json(body): Json<CodeBody>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .accounts
        .verify_reset_code(&body.email, &body.code)
        .await?;
    Ok(Json(ApiMessage::ok("code verified")))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetBody>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .accounts
        .reset_password(&body.email, &body.code, SecretString::from(body.new_password))
        .await?;
    Ok(Json(ApiMessage::ok("password has been reset")))
}
