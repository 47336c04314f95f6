// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamp formatting shared by every stored record.
//!
//! All timestamps are RFC 3339 UTC with millisecond precision and a `Z`
//! suffix, matching SQLite's `strftime('%Y-%m-%dT%H:%M:%fZ')`. That keeps
//! values written from Rust and from SQL defaults lexically comparable.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC instant as a storage timestamp.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The current instant as a storage timestamp.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
