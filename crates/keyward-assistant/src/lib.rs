// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-app password assistant for Keyward.
//!
//! [`Assistant`] frames a user's question with a fixed password-security
//! system prompt and the recent conversation, then hands it to a
//! [`keyward_core::ChatProvider`]. [`OpenAiProvider`] talks to any
//! OpenAI-compatible chat completions endpoint; its API key comes from the
//! environment variable named by `assistant.api_key_env`.

pub mod client;
pub mod provider;
pub mod service;
pub mod types;

pub use client::CompletionClient;
pub use provider::{OpenAiProvider, UnconfiguredProvider, provider_from_config};
pub use service::{Assistant, MAX_HISTORY_TURNS, SYSTEM_PROMPT};
pub use types::ChatTurn;
