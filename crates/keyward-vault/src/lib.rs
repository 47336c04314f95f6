// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saved credentials for Keyward.
//!
//! [`VaultService`] stores site passwords as cipher tokens and hands them
//! back masked, except through an explicit reveal. The [`generator`] module
//! produces and shuffles random passwords.

pub mod generator;
pub mod service;

pub use generator::{GeneratorOptions, generate, shuffle};
pub use service::{EditEntry, MASKED_PASSWORD, MaskedEntry, NewEntry, VaultService};
