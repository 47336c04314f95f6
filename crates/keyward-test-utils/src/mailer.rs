// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory code mailer.

use async_trait::async_trait;
use keyward_auth::{CodeMailer, CodePurpose};
use keyward_core::KeywardError;
use tokio::sync::Mutex;

/// A code handed to [`MemoryMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub to: String,
    pub purpose: CodePurpose,
    pub code: String,
}

/// Records codes instead of delivering them.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<SentCode>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent code sent to `to` for `purpose`.
    pub async fn last_code(&self, to: &str, purpose: CodePurpose) -> Option<String> {
        self.sent
            .lock()
            .await
            .iter()
            .rev()
            .find(|s| s.purpose == purpose && s.to.eq_ignore_ascii_case(to))
            .map(|s| s.code.clone())
    }

    pub async fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl CodeMailer for MemoryMailer {
    async fn send_code(
        &self,
        to: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<(), KeywardError> {
        self.sent.lock().await.push(SentCode {
            to: to.to_string(),
            purpose,
            code: code.to_string(),
        });
        Ok(())
    }
}
