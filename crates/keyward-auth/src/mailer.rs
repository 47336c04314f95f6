// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery of one-time verification and reset codes.

use async_trait::async_trait;
use keyward_core::KeywardError;
use tracing::{debug, info};

/// Why a code is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    /// Confirms the email address of a new signup.
    Verification,
    /// Authorizes a password reset.
    PasswordReset,
}

impl CodePurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            CodePurpose::Verification => "verification",
            CodePurpose::PasswordReset => "password_reset",
        }
    }
}

impl std::fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends one-time codes to account holders.
#[async_trait]
pub trait CodeMailer: Send + Sync {
    async fn send_code(
        &self,
        to: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<(), KeywardError>;
}

/// Development mailer that writes codes to the log instead of sending them.
///
/// The recipient and purpose are logged at `info`; the code itself only at
/// `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl CodeMailer for LogMailer {
    async fn send_code(
        &self,
        to: &str,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<(), KeywardError> {
        info!(to, purpose = %purpose, "one-time code issued");
        debug!(to, purpose = %purpose, code, "one-time code value");
        Ok(())
    }
}
