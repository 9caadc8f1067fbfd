// ABOUTME: OAuth token lifecycle for PowerTraxx: cache, expiry buffer, refresh exchange
// ABOUTME: Single-flight refresh per account so a refresh token is never spent twice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use fitsync_core::{ProviderError, ProviderResult};
use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::api::{self, TokenResponse};
use crate::account::ServiceRecord;
use crate::config::PowerTraxxConfig;
use crate::constants::{PROVIDER_NAME, TOKEN_EXPIRY_BUFFER_SECS, TOKEN_PATH};

/// An access/refresh token pair with its buffered expiry.
///
/// Owned exclusively by the token lifecycle manager: written on every
/// successful exchange, read on every authenticated call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    /// Short-lived bearer token
    pub access_token: String,
    /// Long-lived refresh credential
    pub refresh_token: String,
    /// Buffered expiry: always at least 30 seconds before the
    /// provider-declared expiry, so a token never lapses mid-request
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Build a record from a token-endpoint response, applying the expiry
    /// buffer relative to `now`.
    #[must_use]
    pub fn from_exchange(
        access_token: String,
        refresh_token: String,
        expires_in_seconds: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: now + Duration::seconds(expires_in_seconds - TOKEN_EXPIRY_BUFFER_SECS),
        }
    }

    /// True while the access token may still be used.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Time-bounded token cache keyed by external account id.
///
/// Explicitly constructed and injected into the [`TokenManager`] rather than
/// living in process-global state, so single-flight refresh stays testable
/// and accounts never share hidden state.
#[derive(Debug, Default)]
pub struct TokenStore {
    entries: RwLock<HashMap<String, TokenRecord>>,
}

impl TokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record for the account, if any.
    pub async fn get(&self, external_id: &str) -> Option<TokenRecord> {
        self.entries.read().await.get(external_id).cloned()
    }

    /// Store the record for the account, replacing any previous one.
    pub async fn insert(&self, external_id: &str, record: TokenRecord) {
        self.entries
            .write()
            .await
            .insert(external_id.to_owned(), record);
    }

    /// Drop the account's cached record.
    pub async fn remove(&self, external_id: &str) {
        self.entries.write().await.remove(external_id);
    }
}

/// Token lifecycle manager: returns valid bearer tokens, transparently
/// refreshing through the provider's token endpoint when the cached token is
/// missing or inside the expiry buffer.
pub struct TokenManager {
    config: Arc<PowerTraxxConfig>,
    client: Client,
    store: Arc<TokenStore>,
    refresh_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TokenManager {
    /// Create a manager over an injected store.
    #[must_use]
    pub fn new(config: Arc<PowerTraxxConfig>, client: Client, store: Arc<TokenStore>) -> Self {
        Self {
            config,
            client,
            store,
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The store this manager reads and writes.
    #[must_use]
    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Return a currently valid access token for the account, refreshing if
    /// necessary.
    ///
    /// Concurrent callers for the same account share a single refresh
    /// exchange: the first caller through the per-account lock performs the
    /// POST, everyone else observes the refreshed record on re-check. A
    /// refresh token is therefore never presented to the provider twice.
    ///
    /// # Errors
    ///
    /// `Authorization` (blocking) on any 4xx from the token endpoint,
    /// `RemoteService` on other non-200 statuses, `Decode` on an
    /// unparseable token response, `Network` on transport failure.
    pub async fn access_token(&self, record: &ServiceRecord) -> ProviderResult<String> {
        if let Some(token) = self.store.get(record.external_id()).await {
            if token.is_valid_at(Utc::now()) {
                return Ok(token.access_token);
            }
        }

        let account_lock = self.refresh_lock(record.external_id()).await;
        let _guard = account_lock.lock().await;

        // Re-check under the lock: a concurrent caller may have refreshed
        // while this one was waiting.
        if let Some(token) = self.store.get(record.external_id()).await {
            if token.is_valid_at(Utc::now()) {
                return Ok(token.access_token);
            }
        }

        debug!(
            account = record.external_id(),
            "cached token missing or expired, refreshing"
        );
        let refreshed = self.exchange_refresh_token(record).await?;
        self.store
            .insert(record.external_id(), refreshed.clone())
            .await;
        // Propagate the new pair into the long-lived binding so the next
        // process run can refresh again.
        record.set_authorization(refreshed.clone()).await;
        Ok(refreshed.access_token)
    }

    /// `Authorization` header value for the account.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TokenManager::access_token`].
    pub async fn auth_header(&self, record: &ServiceRecord) -> ProviderResult<String> {
        Ok(format!("Bearer {}", self.access_token(record).await?))
    }

    async fn refresh_lock(&self, external_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.refresh_locks.lock().await;
        Arc::clone(locks.entry(external_id.to_owned()).or_default())
    }

    async fn exchange_refresh_token(&self, record: &ServiceRecord) -> ProviderResult<TokenRecord> {
        let refresh_token = record.authorization().await.refresh_token;
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(self.config.endpoint(TOKEN_PATH))
            .form(&params)
            .send()
            .await
            .map_err(api::network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(api::network_error)?;

        if !status.is_success() {
            return Err(api::token_status_error(status.as_u16(), body));
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|_| ProviderError::Decode {
                provider: PROVIDER_NAME,
                status: status.as_u16(),
                body,
            })?;

        Ok(TokenRecord::from_exchange(
            parsed.access_token,
            parsed.refresh_token,
            parsed.expires_in,
            Utc::now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_buffer_is_applied() {
        let now = Utc::now();
        let record =
            TokenRecord::from_exchange("access".to_owned(), "refresh".to_owned(), 60, now);

        // A 60-second token is treated as expired 30 seconds after issuance.
        assert_eq!(record.expires_at, now + Duration::seconds(30));
        assert!(record.is_valid_at(now + Duration::seconds(29)));
        assert!(!record.is_valid_at(now + Duration::seconds(30)));
        assert!(!record.is_valid_at(now + Duration::seconds(31)));
    }

    #[tokio::test]
    async fn store_round_trip() {
        let store = TokenStore::new();
        let record =
            TokenRecord::from_exchange("a".to_owned(), "r".to_owned(), 3600, Utc::now());
        store.insert("user-1", record.clone()).await;
        assert_eq!(store.get("user-1").await, Some(record));
        assert_eq!(store.get("user-2").await, None);

        store.remove("user-1").await;
        assert_eq!(store.get("user-1").await, None);
    }
}
