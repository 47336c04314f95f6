// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The assistant: system prompt, history trimming, and provider dispatch.

use std::sync::Arc;

use keyward_core::{ChatMessage, ChatProvider, ChatRole, KeywardError};
use tracing::debug;

use crate::types::ChatTurn;

/// Instructions sent ahead of every conversation.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant for a password manager application. \
You can provide tips on password security, help with using the application features, and answer \
general questions about password management best practices. You cannot access or modify any user \
passwords. Keep your responses concise and focused on password management.";

/// Only the most recent turns of client-supplied history are forwarded.
pub const MAX_HISTORY_TURNS: usize = 20;

/// Answers password-management questions through a [`ChatProvider`].
///
/// The assistant never sees vault contents: the only inputs are the
/// user's message and the history the client sends back.
#[derive(Clone)]
pub struct Assistant {
    provider: Arc<dyn ChatProvider>,
}

impl Assistant {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Reply to `message` given the earlier `history`.
    ///
    /// Blank messages are rejected before the provider is called. Blank
    /// history turns are dropped.
    pub async fn reply(&self, message: &str, history: &[ChatTurn]) -> Result<String, KeywardError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(KeywardError::Validation("message is required".into()));
        }

        let messages = conversation(message, history);
        let reply = self.provider.complete(&messages).await?;
        debug!(
            provider = self.provider.name(),
            turns = messages.len(),
            "assistant replied"
        );
        Ok(reply)
    }
}

fn conversation(message: &str, history: &[ChatTurn]) -> Vec<ChatMessage> {
    let recent = &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(ChatMessage::new(ChatRole::System, SYSTEM_PROMPT));
    messages.extend(
        recent
            .iter()
            .filter(|turn| !turn.text.trim().is_empty())
            .map(ChatTurn::to_message),
    );
    messages.push(ChatMessage::new(ChatRole::User, message));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use keyward_core::{HealthStatus, PluginAdapter};
    use tokio::sync::Mutex;

    /// Records what it was sent and answers with a fixed reply.
    #[derive(Default)]
    struct RecordingProvider {
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl PluginAdapter for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(0, 0, 0)
        }

        async fn health_check(&self) -> Result<HealthStatus, KeywardError> {
            Ok(HealthStatus::Healthy)
        }

        async fn shutdown(&self) -> Result<(), KeywardError> {
            Ok(())
        }
    }

    #[async_trait]
    impl ChatProvider for RecordingProvider {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, KeywardError> {
            self.seen.lock().await.push(messages.to_vec());
            Ok("Use a long passphrase.".into())
        }
    }

    #[tokio::test]
    async fn reply_frames_history_with_system_prompt() {
        let provider = Arc::new(RecordingProvider::default());
        let assistant = Assistant::new(provider.clone());

        let history = [
            ChatTurn::user("is 8 characters enough?"),
            ChatTurn::assistant("Not anymore."),
            ChatTurn::user("   "),
        ];
        let reply = assistant.reply("  what then?  ", &history).await.unwrap();
        assert_eq!(reply, "Use a long passphrase.");

        let seen = provider.seen.lock().await;
        let sent = &seen[0];
        let roles: Vec<ChatRole> = sent.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::User]
        );
        assert_eq!(sent[0].content, SYSTEM_PROMPT);
        assert_eq!(sent[3].content, "what then?");
    }

    #[tokio::test]
    async fn blank_message_never_reaches_provider() {
        let provider = Arc::new(RecordingProvider::default());
        let assistant = Assistant::new(provider.clone());

        let err = assistant.reply(" \n", &[]).await.unwrap_err();
        assert!(matches!(err, KeywardError::Validation(ref m) if m == "message is required"));
        assert!(provider.seen.lock().await.is_empty());
    }

    #[test]
    fn long_history_keeps_the_latest_turns() {
        let history: Vec<ChatTurn> = (0..50).map(|i| ChatTurn::user(format!("turn {i}"))).collect();
        let messages = conversation("now", &history);
        assert_eq!(messages.len(), MAX_HISTORY_TURNS + 2);
        assert_eq!(messages[1].content, "turn 30");
        assert_eq!(messages[MAX_HISTORY_TURNS].content, "turn 49");
    }
}
