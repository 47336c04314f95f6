// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handler for the password assistant.

use axum::Json;
use axum::extract::{Extension, State};
use axum::response::IntoResponse;
use keyward_assistant::ChatTurn;
use serde::Deserialize;

use crate::error::ApiError;
use crate::response::{ApiData, ChatReplyBody};
use crate::server::AppState;
use crate::session::CurrentUser;

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageBody {
    message: String,
    chat_history: Vec<ChatTurn>,
}

/// POST /api/chatbot/message
pub async fn message(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<MessageBody>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .assistant
        .reply(&body.message, &body.chat_history)
        .await?;
    tracing::debug!(user_id = %user.id, "assistant reply sent");
    Ok(Json(ApiData::ok("response generated", ChatReplyBody { response })))
}
