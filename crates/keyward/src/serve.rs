// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `keyward serve`: open storage, wire the services, and run the API.

use std::sync::Arc;
use std::time::Duration;

use keyward_assistant::{Assistant, provider_from_config};
use keyward_auth::{AccountService, LogMailer};
use keyward_cipher::CredentialCipher;
use keyward_config::model::KeywardConfig;
use keyward_core::{KeywardError, StorageAdapter};
use keyward_gateway::{AppState, CookieSettings, start_server};
use keyward_storage::SqliteStorage;
use keyward_vault::VaultService;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::shutdown;

/// How often expired sessions and codes are swept.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

pub async fn run_serve(config: KeywardConfig) -> Result<(), KeywardError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
    info!(path = %config.storage.database_path, "storage ready");

    let cipher = CredentialCipher::from_config(&config.cipher);
    if !cipher.is_configured() {
        warn!(
            var = %config.cipher.secret_key_env,
            "secret key material missing; saving and revealing passwords will fail"
        );
    }

    let assistant = Assistant::new(provider_from_config(&config.assistant)?);
    info!(provider = assistant.provider_name(), "assistant ready");

    let accounts = Arc::new(AccountService::new(
        storage.clone(),
        Arc::new(LogMailer),
        &config.auth,
    ));
    let state = AppState {
        accounts: accounts.clone(),
        vault: VaultService::new(storage.clone(), cipher),
        storage: storage.clone(),
        cookie: CookieSettings::from(&config.auth),
        assistant,
    };

    let cancel = shutdown::install_signal_handler();

    {
        let purge_cancel = cancel.clone();
        tokio::spawn(async move {
            purge_loop(accounts, purge_cancel).await;
        });
    }

    let server_cancel = cancel.clone();
    let result = start_server(&config.server.host, config.server.port, state, async move {
        server_cancel.cancelled().await;
    })
    .await;
    cancel.cancel();

    storage.close().await?;
    info!("keyward serve shutdown complete");
    result
}

async fn purge_loop(accounts: Arc<AccountService>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(PURGE_INTERVAL);
    // Skip the first immediate tick.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match accounts.purge_expired().await {
                    Ok(stats) => debug!(
                        pending_signups = stats.pending_signups,
                        reset_codes = stats.reset_codes,
                        sessions = stats.sessions,
                        "purge pass complete"
                    ),
                    Err(e) => warn!(error = %e, "purge pass failed (non-fatal)"),
                }
            }
            _ = cancel.cancelled() => {
                debug!("purge task shutting down");
                break;
            }
        }
    }
}
