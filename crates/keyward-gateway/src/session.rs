// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session cookie handling.
//!
//! Protected routes run behind [`require_session`], which resolves the
//! session cookie to a [`CurrentUser`] request extension. Requests without a
//! valid session never reach the handler.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use keyward_config::model::AuthConfig;
use keyward_core::{KeywardError, User};
use secrecy::{ExposeSecret, SecretString};

use crate::error::ApiError;
use crate::server::AppState;

/// The authenticated account, inserted by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Session cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl From<&AuthConfig> for CookieSettings {
    fn from(config: &AuthConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.secure_cookie,
        }
    }
}

impl CookieSettings {
    /// The cookie carrying a freshly issued session token.
    pub fn session_cookie(&self, token: &SecretString, max_age_secs: u64) -> Cookie<'static> {
        let max_age = i64::try_from(max_age_secs).unwrap_or(i64::MAX);
        Cookie::build((self.name.clone(), token.expose_secret().to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .max_age(cookie::time::Duration::seconds(max_age))
            .build()
    }

    /// Add the session cookie to `jar`.
    pub fn issue(&self, jar: CookieJar, token: &SecretString, max_age_secs: u64) -> CookieJar {
        jar.add(self.session_cookie(token, max_age_secs))
    }

    /// Expire the session cookie the client sent in `jar`.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(self.name.clone()).path("/"))
    }

    /// The session token carried by `jar`, if any.
    pub fn token<'a>(&self, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.name).map(|c| c.value()).filter(|v| !v.is_empty())
    }
}

/// Reject requests without a live session; attach the user otherwise.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = state.cookie.token(&jar) else {
        return Err(ApiError(KeywardError::Unauthorized(
            "not authenticated".to_string(),
        )));
    };
    let user = state.accounts.authenticate(token).await?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::{HeaderMap, HeaderValue};

    fn settings(secure: bool) -> CookieSettings {
        CookieSettings {
            name: "jwt".to_string(),
            secure,
        }
    }

    #[test]
    fn issued_cookie_has_hardening_attributes() {
        let token = SecretString::from("abc123".to_string());
        let issued = settings(true).session_cookie(&token, 1296000);
        assert_eq!(issued.name(), "jwt");
        assert_eq!(issued.value(), "abc123");
        assert_eq!(issued.path(), Some("/"));
        assert_eq!(issued.http_only(), Some(true));
        assert_eq!(issued.same_site(), Some(SameSite::Strict));
        assert_eq!(issued.secure(), Some(true));
        assert_eq!(issued.max_age(), Some(cookie::time::Duration::seconds(1296000)));

        let value = issued.to_string();
        assert!(value.starts_with("jwt=abc123; "));
        assert!(value.contains("Max-Age=1296000"));
        assert!(value.contains("; Secure"));
    }

    #[test]
    fn insecure_cookie_omits_secure() {
        let token = SecretString::from("abc123".to_string());
        let value = settings(false).session_cookie(&token, 60).to_string();
        assert!(!value.contains("Secure"));
        assert!(value.contains("HttpOnly"));
    }

    fn set_cookie_headers(jar: CookieJar) -> Vec<String> {
        use axum::response::IntoResponse;

        jar.into_response()
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn issue_writes_one_set_cookie() {
        let token = SecretString::from("abc123".to_string());
        let headers = set_cookie_headers(settings(true).issue(CookieJar::new(), &token, 60));
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("jwt=abc123"));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let mut request = HeaderMap::new();
        request.insert(COOKIE, HeaderValue::from_static("jwt=tok"));
        let jar = CookieJar::from_headers(&request);

        let headers = set_cookie_headers(settings(true).clear(jar));
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("jwt=;"));
        assert!(headers[0].contains("Max-Age=0"));
        assert!(headers[0].contains("Path=/"));
    }

    #[test]
    fn token_reads_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("other=1; jwt=tok"));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(settings(true).token(&jar), Some("tok"));

        let empty = CookieJar::from_headers(&HeaderMap::new());
        assert_eq!(settings(true).token(&empty), None);
    }
}
