// ABOUTME: Account binding between an external PowerTraxx user and stored credentials
// ABOUTME: Caller-owned record; the adapter only writes back refreshed token pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use tokio::sync::RwLock;

use crate::token::TokenRecord;

/// The long-lived binding between an external account id and its stored
/// OAuth credential, supplied by the sync platform's service-record store.
///
/// The adapter treats the record as read-only, with one exception: after a
/// successful refresh-token exchange the new token pair is written back so
/// the next process run can refresh again (most OAuth servers invalidate a
/// refresh token after first use).
#[derive(Debug)]
pub struct ServiceRecord {
    external_id: String,
    authorization: RwLock<TokenRecord>,
}

impl ServiceRecord {
    /// Create a record for the given external account id and stored credential.
    #[must_use]
    pub fn new(external_id: impl Into<String>, authorization: TokenRecord) -> Self {
        Self {
            external_id: external_id.into(),
            authorization: RwLock::new(authorization),
        }
    }

    /// External account identifier on the provider.
    #[must_use]
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    /// Snapshot of the currently stored credential.
    pub async fn authorization(&self) -> TokenRecord {
        self.authorization.read().await.clone()
    }

    /// Persist a refreshed credential back into the binding.
    pub async fn set_authorization(&self, record: TokenRecord) {
        *self.authorization.write().await = record;
    }
}
