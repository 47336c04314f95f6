// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat provider trait for the in-app password assistant.

use async_trait::async_trait;

use crate::error::KeywardError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ChatMessage;

/// Adapter for a chat completion backend.
///
/// Providers receive the full conversation, system prompt first, and return
/// the reply text. Failures surface as [`KeywardError::Provider`].
#[async_trait]
pub trait ChatProvider: PluginAdapter {
    /// Sends the conversation and returns the assistant's reply.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, KeywardError>;
}
