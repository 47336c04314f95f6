// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of domain errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use keyward_core::KeywardError;

use crate::response::ApiMessage;

/// Body message for every 5xx response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// A [`KeywardError`] on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub KeywardError);

impl From<KeywardError> for ApiError {
    fn from(err: KeywardError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            KeywardError::Validation(_) => StatusCode::BAD_REQUEST,
            KeywardError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            KeywardError::NotFound(_) => StatusCode::NOT_FOUND,
            KeywardError::Conflict(_) => StatusCode::CONFLICT,
            KeywardError::Config(_)
            | KeywardError::Storage { .. }
            | KeywardError::Cipher(_)
            | KeywardError::Provider { .. }
            | KeywardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if self.0.is_internal() {
            tracing::error!(error = %self.0, "request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(ApiMessage::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyward_core::CipherError;

    #[test]
    fn client_errors_keep_their_message() {
        let cases = [
            (KeywardError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (KeywardError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (KeywardError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (KeywardError::Conflict("dup".into()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[test]
    fn every_internal_error_is_500() {
        let cases = [
            KeywardError::Config("x".into()),
            KeywardError::Storage {
                source: Box::new(std::io::Error::other("disk")),
            },
            KeywardError::Cipher(CipherError::Decryption),
            KeywardError::Cipher(CipherError::Configuration("unset".into())),
            KeywardError::Provider {
                message: "upstream returned 503".into(),
                source: None,
            },
            KeywardError::Internal("x".into()),
        ];
        for err in cases {
            let resp = ApiError(err).into_response();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
