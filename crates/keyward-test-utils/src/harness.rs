// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end HTTP testing.
//!
//! `TestHarness` assembles the complete Keyward stack on a temp SQLite
//! database: storage, cipher, account and vault services, and the axum
//! router. Requests go through `tower::ServiceExt::oneshot`, so no socket is
//! bound.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use keyward_assistant::Assistant;
use keyward_auth::{AccountService, CodePurpose};
use keyward_cipher::{CredentialCipher, KdfParams, SecretKeyMaterial};
use keyward_config::model::{AuthConfig, StorageConfig};
use keyward_core::{KeywardError, StorageAdapter};
use keyward_gateway::{AppState, CookieSettings, build_router};
use keyward_storage::SqliteStorage;
use keyward_vault::VaultService;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::chat::ScriptedChatProvider;
use crate::mailer::MemoryMailer;

const BODY_LIMIT: usize = 1024 * 1024;

fn internal(what: &str, e: impl std::fmt::Display) -> KeywardError {
    KeywardError::Internal(format!("{what}: {e}"))
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    secret: Option<String>,
    auth: AuthConfig,
    chat: ScriptedChatProvider,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            secret: Some("test-secret-key".to_string()),
            auth: AuthConfig {
                secure_cookie: false,
                ..AuthConfig::default()
            },
            chat: ScriptedChatProvider::replying("Use a unique passphrase for every site."),
        }
    }

    /// Use `secret` as the credential secret key material.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Run with no secret key material, as if the variable were unset.
    pub fn without_secret(mut self) -> Self {
        self.secret = None;
        self
    }

    /// Override account and session settings.
    pub fn with_auth_config(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Answer chatbot requests with `provider` instead of the canned reply.
    pub fn with_chat_provider(mut self, provider: ScriptedChatProvider) -> Self {
        self.chat = provider;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, KeywardError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| KeywardError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("keyward-test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        });
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        // Lowest scrypt cost config validation allows.
        let params = KdfParams {
            log_n: 10,
            r: 8,
            p: 1,
        };
        let cipher = match self.secret {
            Some(secret) => CredentialCipher::new(SecretKeyMaterial::new(secret)?, params),
            None => CredentialCipher::from_env("KEYWARD_TEST_UTILS_NO_SECRET", params),
        };

        let mailer = Arc::new(MemoryMailer::new());
        let accounts = Arc::new(AccountService::new(
            storage.clone(),
            mailer.clone(),
            &self.auth,
        ));
        let chat = Arc::new(self.chat);
        let state = AppState {
            accounts,
            vault: VaultService::new(storage.clone(), cipher),
            storage: storage.clone(),
            cookie: CookieSettings::from(&self.auth),
            assistant: Assistant::new(chat.clone()),
        };

        Ok(TestHarness {
            router: build_router(state.clone()),
            state,
            storage,
            mailer,
            chat,
            _temp_dir: temp_dir,
        })
    }
}

/// Status, JSON body, and session cookie of a response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookie: Option<String>,
}

impl TestResponse {
    /// The `name=value` pair of the `Set-Cookie` header, ready to send back.
    pub fn cookie(&self) -> Option<String> {
        self.set_cookie
            .as_deref()
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }
}

/// A complete Keyward stack over a temp database.
pub struct TestHarness {
    /// The application router.
    pub router: Router,
    /// Shared handler state, for driving services directly.
    pub state: AppState,
    /// SQLite storage (temp DB, removed on drop).
    pub storage: Arc<dyn StorageAdapter>,
    /// Every verification and reset code sent so far.
    pub mailer: Arc<MemoryMailer>,
    /// The chat provider behind `/api/chatbot/message`.
    pub chat: Arc<ScriptedChatProvider>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send one request through the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> Result<TestResponse, KeywardError> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .map_err(|e| internal("invalid test request", e))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| internal("router failed", e))?;

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .map_err(|e| internal("failed to read body", e))?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| internal("body is not JSON", e))?
        };

        Ok(TestResponse {
            status,
            body,
            set_cookie,
        })
    }

    /// Sign up and verify an account. Returns the session cookie.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, KeywardError> {
        let resp = self
            .request(
                Method::POST,
                "/api/auth/signup",
                Some(json!({ "name": name, "email": email, "password": password })),
                None,
            )
            .await?;
        if resp.status != StatusCode::CREATED {
            return Err(internal("signup failed", resp.body));
        }

        let code = self
            .mailer
            .last_code(email, CodePurpose::Verification)
            .await
            .ok_or_else(|| KeywardError::Internal("no verification code was sent".to_string()))?;
        let resp = self
            .request(
                Method::POST,
                "/api/auth/verify",
                Some(json!({ "email": email, "code": code })),
                None,
            )
            .await?;
        resp.cookie()
            .ok_or_else(|| internal("verify did not set a cookie", resp.body))
    }
}
