// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Keyward.
//!
//! Exposes accounts, saved passwords and the password assistant as a JSON
//! REST API on axum. Responses use a `{ "success", "message" }` envelope; domain errors
//! map to 400/401/404/409, and every internal failure becomes a bare 500.

pub mod account;
pub mod chatbot;
pub mod error;
pub mod health;
pub mod passwords;
pub mod response;
pub mod server;
pub mod session;

pub use error::{ApiError, INTERNAL_ERROR_MESSAGE};
pub use server::{AppState, build_router, start_server};
pub use session::{CookieSettings, CurrentUser};
