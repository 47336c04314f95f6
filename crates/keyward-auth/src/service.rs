// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account lifecycle: signup with email verification, login sessions,
//! profile updates, and password reset.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use keyward_config::model::AuthConfig;
use keyward_core::{KeywardError, Session, StorageAdapter, User, format_timestamp, now_timestamp};
use rand::Rng;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::mailer::{CodeMailer, CodePurpose};
use crate::password::{hash_password_async, verify_password_async};
use crate::session::{IssuedSession, generate_token, hash_token, token_hash};
use crate::store::{ExpiringStore, Lookup};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Answer given by forgot-password regardless of whether the account exists.
pub const RESET_REQUESTED_MESSAGE: &str =
    "if an account exists for this email, a reset code has been sent";

const INVALID_CREDENTIALS: &str = "invalid credentials";
const INVALID_CODE: &str = "invalid verification code";
const EXPIRED_CODE: &str = "verification code has expired";

/// A signup that is waiting for its email code.
#[derive(Clone)]
struct PendingSignup {
    name: String,
    email: String,
    password_hash: String,
    code: String,
}

/// Input for [`AccountService::signup`].
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Rows removed by [`AccountService::purge_expired`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeStats {
    pub pending_signups: usize,
    pub reset_codes: usize,
    pub sessions: u64,
}

/// Account and session service.
pub struct AccountService<S: ?Sized = dyn StorageAdapter> {
    storage: Arc<S>,
    mailer: Arc<dyn CodeMailer>,
    pending: ExpiringStore<PendingSignup>,
    resets: ExpiringStore<String>,
    session_ttl: Duration,
}

fn require(value: &str, what: &str) -> Result<(), KeywardError> {
    if value.trim().is_empty() {
        Err(KeywardError::Validation(format!("{what} is required")))
    } else {
        Ok(())
    }
}

fn code_key(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32))
}

/// Check `supplied` against a stored code, mapping the lookup to the
/// client-facing validation errors.
fn check_code(lookup: Lookup<String>, supplied: &str) -> Result<(), KeywardError> {
    match lookup {
        Lookup::Live(code) if code == supplied.trim() => Ok(()),
        Lookup::Live(_) | Lookup::Missing => Err(KeywardError::Validation(INVALID_CODE.to_string())),
        Lookup::Expired => Err(KeywardError::Validation(EXPIRED_CODE.to_string())),
    }
}

impl<S: StorageAdapter + ?Sized> AccountService<S> {
    pub fn new(storage: Arc<S>, mailer: Arc<dyn CodeMailer>, config: &AuthConfig) -> Self {
        let code_ttl = Duration::from_secs(config.code_ttl_secs);
        Self {
            storage,
            mailer,
            pending: ExpiringStore::new(code_ttl),
            resets: ExpiringStore::new(code_ttl),
            session_ttl: Duration::from_secs(config.session_ttl_secs),
        }
    }

    /// Session lifetime used for new sessions and the cookie `Max-Age`.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Start a signup: validate, hash the password, and mail a code.
    ///
    /// Nothing is written to the store until [`verify`](Self::verify).
    pub async fn signup(&self, request: SignupRequest) -> Result<(), KeywardError> {
        require(&request.name, "name")?;
        require(&request.email, "email")?;
        require(request.password.expose_secret(), "password")?;

        let email = request.email.trim().to_string();
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(KeywardError::Validation("invalid email address".to_string()));
        }
        if self.storage.get_user_by_email(&email).await?.is_some() {
            return Err(KeywardError::Conflict(
                "an account with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password_async(request.password).await?;
        let code = new_code();
        self.pending.insert(
            code_key(&email),
            PendingSignup {
                name: request.name.trim().to_string(),
                email: email.clone(),
                password_hash,
                code: code.clone(),
            },
        );
        self.mailer
            .send_code(&email, CodePurpose::Verification, &code)
            .await?;

        info!(email = %email, "signup pending verification");
        Ok(())
    }

    /// Finish a signup: check the code, create the account, open a session.
    pub async fn verify(&self, email: &str, code: &str) -> Result<(User, IssuedSession), KeywardError> {
        require(email, "email")?;
        require(code, "verification code")?;

        let key = code_key(email);
        let pending = match self.pending.get(&key) {
            Lookup::Live(pending) if pending.code == code.trim() => pending,
            Lookup::Live(_) | Lookup::Missing => {
                return Err(KeywardError::Validation(INVALID_CODE.to_string()));
            }
            Lookup::Expired => return Err(KeywardError::Validation(EXPIRED_CODE.to_string())),
        };
        self.pending.remove(&key);

        let now = now_timestamp();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: pending.name,
            email: pending.email,
            password_hash: pending.password_hash,
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.create_user(&user).await?;
        info!(user_id = %user.id, "account created");

        let issued = self.open_session(&user.id).await?;
        Ok((user, issued))
    }

    /// Check credentials and open a session.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<(User, IssuedSession), KeywardError> {
        require(email, "email")?;
        require(password.expose_secret(), "password")?;

        let Some(user) = self.storage.get_user_by_email(email.trim()).await? else {
            debug!("login rejected: unknown email");
            return Err(KeywardError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !verify_password_async(password, user.password_hash.clone()).await? {
            debug!(user_id = %user.id, "login rejected: wrong password");
            return Err(KeywardError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let issued = self.open_session(&user.id).await?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, issued))
    }

    async fn open_session(&self, user_id: &str) -> Result<IssuedSession, KeywardError> {
        let ttl = TimeDelta::from_std(self.session_ttl)
            .map_err(|e| KeywardError::Internal(format!("session lifetime out of range: {e}")))?;
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| KeywardError::Internal("session expiry overflows".to_string()))?;

        let token = generate_token()?;
        let session = Session {
            token_hash: token_hash(&token),
            user_id: user_id.to_string(),
            created_at: format_timestamp(now),
            expires_at: format_timestamp(expires),
        };
        self.storage.create_session(&session).await?;

        Ok(IssuedSession {
            token,
            expires_at: session.expires_at,
            max_age_secs: self.session_ttl.as_secs(),
        })
    }

    /// Resolve a session cookie value to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User, KeywardError> {
        let unauthorized = || KeywardError::Unauthorized("not authenticated".to_string());
        if token.is_empty() {
            return Err(unauthorized());
        }

        let hash = hash_token(token);
        let session = self
            .storage
            .get_session(&hash)
            .await?
            .ok_or_else(unauthorized)?;
        if session.expires_at <= now_timestamp() {
            self.storage.delete_session(&hash).await?;
            debug!(user_id = %session.user_id, "expired session rejected");
            return Err(KeywardError::Unauthorized("session expired".to_string()));
        }

        self.storage
            .get_user(&session.user_id)
            .await?
            .ok_or_else(unauthorized)
    }

    /// End the session identified by `token`. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), KeywardError> {
        if self.storage.delete_session(&hash_token(token)).await? {
            debug!("session ended");
        }
        Ok(())
    }

    /// Current profile of a logged-in user.
    pub async fn status(&self, user_id: &str) -> Result<User, KeywardError> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| KeywardError::NotFound("account not found".to_string()))
    }

    /// Change the display name and/or login password.
    pub async fn update_account(
        &self,
        user_id: &str,
        name: Option<String>,
        password: Option<SecretString>,
    ) -> Result<User, KeywardError> {
        if name.is_none() && password.is_none() {
            return Err(KeywardError::Validation("nothing to update".to_string()));
        }
        if let Some(name) = &name {
            require(name, "name")?;
        }
        let password_hash = match password {
            Some(password) => {
                require(password.expose_secret(), "password")?;
                Some(hash_password_async(password).await?)
            }
            None => None,
        };

        let user = self
            .storage
            .update_user(user_id, name.as_deref().map(str::trim), password_hash.as_deref())
            .await?
            .ok_or_else(|| KeywardError::NotFound("account not found".to_string()))?;
        info!(user_id, password_changed = password_hash.is_some(), "account updated");
        Ok(user)
    }

    /// Delete an account together with its sessions and vault entries.
    pub async fn delete_account(&self, user_id: &str) -> Result<(), KeywardError> {
        if !self.storage.delete_user(user_id).await? {
            return Err(KeywardError::NotFound("account not found".to_string()));
        }
        info!(user_id, "account deleted");
        Ok(())
    }

    /// Mail a reset code if the account exists. The outcome is not revealed.
    pub async fn forgot_password(&self, email: &str) -> Result<(), KeywardError> {
        require(email, "email")?;

        let Some(user) = self.storage.get_user_by_email(email.trim()).await? else {
            debug!("password reset requested for unknown email");
            return Ok(());
        };
        let code = new_code();
        self.resets.insert(code_key(&user.email), code.clone());
        if let Err(e) = self
            .mailer
            .send_code(&user.email, CodePurpose::PasswordReset, &code)
            .await
        {
            warn!(user_id = %user.id, error = %e, "failed to send password reset code");
        }
        Ok(())
    }

    /// Check a reset code without consuming it.
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> Result<(), KeywardError> {
        require(email, "email")?;
        require(code, "verification code")?;
        check_code(self.resets.get(&code_key(email)), code)
    }

    /// Consume a reset code, set the new password, and revoke every session.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: SecretString,
    ) -> Result<(), KeywardError> {
        require(email, "email")?;
        require(code, "verification code")?;
        require(new_password.expose_secret(), "password")?;

        let key = code_key(email);
        check_code(self.resets.get(&key), code)?;
        self.resets.remove(&key);

        let user = self
            .storage
            .get_user_by_email(email.trim())
            .await?
            .ok_or_else(|| KeywardError::NotFound("account not found".to_string()))?;
        let password_hash = hash_password_async(new_password).await?;
        self.storage
            .update_user(&user.id, None, Some(&password_hash))
            .await?;
        let revoked = self.storage.delete_sessions_for_user(&user.id).await?;

        info!(user_id = %user.id, revoked, "password reset");
        Ok(())
    }

    /// Drop expired pending signups, reset codes, and sessions.
    pub async fn purge_expired(&self) -> Result<PurgeStats, KeywardError> {
        let stats = PurgeStats {
            pending_signups: self.pending.purge_expired(),
            reset_codes: self.resets.purge_expired(),
            sessions: self.storage.purge_expired_sessions(&now_timestamp()).await?,
        };
        if stats != PurgeStats::default() {
            debug!(?stats, "purged expired auth state");
        }
        Ok(stats)
    }
}
