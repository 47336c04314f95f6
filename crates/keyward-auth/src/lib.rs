// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Accounts and login sessions for Keyward.
//!
//! Login passwords are Argon2id hashes. Sessions are random tokens whose
//! SHA-256 is the only thing stored. Verification and reset codes live in
//! an in-memory [`ExpiringStore`] and are delivered through a [`CodeMailer`].

pub mod mailer;
pub mod password;
pub mod service;
pub mod session;
pub mod store;

pub use mailer::{CodeMailer, CodePurpose, LogMailer};
pub use service::{AccountService, PurgeStats, RESET_REQUESTED_MESSAGE, SignupRequest};
pub use session::IssuedSession;
pub use store::{ExpiringStore, Lookup};
