// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted chat provider.

use async_trait::async_trait;
use keyward_core::{ChatMessage, ChatProvider, HealthStatus, KeywardError, PluginAdapter};
use tokio::sync::Mutex;

/// Answers every request the same way and keeps what it was sent.
#[derive(Debug)]
pub struct ScriptedChatProvider {
    reply: Option<String>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChatProvider {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with a provider error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Every conversation handed to the provider so far.
    pub async fn seen(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for ScriptedChatProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, KeywardError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KeywardError> {
        Ok(())
    }
}

#[async_trait]
impl ChatProvider for ScriptedChatProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, KeywardError> {
        self.seen.lock().await.push(messages.to_vec());
        self.reply.clone().ok_or_else(|| KeywardError::Provider {
            message: "scripted provider failure".into(),
            source: None,
        })
    }
}
