// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Keyward integration tests.
//!
//! - [`TestHarness`] - the full HTTP stack over a temp SQLite database
//! - [`MemoryMailer`] - a code mailer that keeps every code for inspection
//! - [`ScriptedChatProvider`] - a chat provider with a canned reply

pub mod chat;
pub mod harness;
pub mod mailer;

pub use chat::ScriptedChatProvider;
pub use harness::{TestHarness, TestHarnessBuilder, TestResponse};
pub use mailer::MemoryMailer;
