// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handlers under `/api/password`.
//!
//! Every route acts on the vault of the session's user only.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use keyward_vault::{EditEntry, GeneratorOptions, NewEntry};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ApiError;
use crate::response::{ApiData, ApiMessage, CountBody, EntriesBody, EntryBody, PasswordBody};
use crate::server::AppState;
use crate::session::CurrentUser;

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AddBody {
    site_name: String,
    site_url: String,
    email: String,
    password: String,
    notes: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct EditBody {
    site_name: String,
    email: String,
    new_site_name: Option<String>,
    new_site_url: Option<String>,
    new_email: Option<String>,
    new_password: Option<String>,
    notes: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityBody {
    site_name: String,
    email: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    q: String,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(flatten)]
    options: GeneratorOptions,
    /// When set, shuffle this password instead of generating a new one.
    shuffle: Option<String>,
}

/// GET /api/password/all
pub async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let passwords = state.vault.list(&user.id).await?;
    Ok(Json(ApiData::ok("passwords fetched", EntriesBody { passwords })))
}

/// GET /api/password/search?q=
pub async fn search(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let passwords = state.vault.search(&user.id, &query.q).await?;
    Ok(Json(ApiData::ok("passwords fetched", EntriesBody { passwords })))
}

/// POST /api/password/add
pub async fn add(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<AddBody>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .vault
        .add(
            &user.id,
            NewEntry {
                site_name: body.site_name,
                site_url: body.site_url,
                email: body.email,
                password: SecretString::from(body.password),
                notes: body.notes,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiData::ok("password added", EntryBody { entry })),
    ))
}

/// PUT /api/password/edit
pub async fn edit(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<EditBody>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .vault
        .edit(
            &user.id,
            EditEntry {
                site_name: body.site_name,
                email: body.email,
                new_site_name: body.new_site_name,
                new_site_url: body.new_site_url,
                new_email: body.new_email,
                new_password: body.new_password.map(SecretString::from),
                notes: body.notes,
            },
        )
        .await?;
    Ok(Json(ApiData::ok("password updated", EntryBody { entry })))
}

/// GET /api/password/{site_name}/{email}
pub async fn reveal(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((site_name, email)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let secret = state.vault.reveal(&user.id, &site_name, &email).await?;
    Ok(Json(ApiData::ok(
        "password fetched",
        PasswordBody {
            password: secret.expose_secret().to_string(),
        },
    )))
}

/// DELETE /api/password
pub async fn delete_one(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<IdentityBody>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .vault
        .delete(&user.id, &body.site_name, &body.email)
        .await?;
    Ok(Json(ApiMessage::ok("password deleted")))
}

/// DELETE /api/password/all
pub async fn delete_all(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.vault.delete_all(&user.id).await?;
    Ok(Json(ApiData::ok("all passwords deleted", CountBody { deleted })))
}

/// POST /api/password/generate
pub async fn generate(
    Extension(CurrentUser(_)): Extension<CurrentUser>,
    Json(body): Json<GenerateBody>,
) -> Result<impl IntoResponse, ApiError> {
    let password = match body.shuffle {
        Some(existing) => keyward_vault::shuffle(&existing)?,
        None => keyward_vault::generate(&body.options)?,
    };
    Ok(Json(ApiData::ok("password generated", PasswordBody { password })))
}
