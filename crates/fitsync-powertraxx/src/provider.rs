// ABOUTME: PowerTraxx service operations: OAuth handshake, list/download/upload/delete
// ABOUTME: All authenticated calls route through the token lifecycle manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fitsync_core::{Activity, ActivityType, ProviderError, ProviderResult};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::account::ServiceRecord;
use crate::api::{
    self, DetailRecord, SummaryRecord, TokenResponse, UploadResponse, UserInfoResponse,
};
use crate::config::PowerTraxxConfig;
use crate::constants::{
    ACTIVITY_LIST_PATH, ACTIVITY_PATH, AUTHORIZE_PATH, INCREMENTAL_PAGE_SIZE, OAUTH_SCOPE,
    OAUTH_STATE, PROVIDER_NAME, TOKEN_PATH, USERINFO_PATH,
};
use crate::sport::activity_type_from_remote;
use crate::token::{TokenManager, TokenRecord, TokenStore};
use crate::translate;

/// Lightweight index record produced by the activity list fetcher.
///
/// Ephemeral: consumed by the scheduler to decide which activities need a
/// full download, never persisted by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySummary {
    /// Remote activity id
    pub external_id: String,
    /// Remote activity name, when set
    pub name: Option<String>,
    /// Canonical sport type (forward-mapped, unknown codes become `Other`)
    pub activity_type: ActivityType,
    /// Declared distance in meters
    pub distance_meters: Option<f64>,
    /// Activity start (UTC)
    pub start_time: DateTime<Utc>,
    /// Activity end (UTC)
    pub end_time: DateTime<Utc>,
}

impl ActivitySummary {
    /// Build the canonical activity stub for this summary, with its
    /// content-hash UID computed.
    #[must_use]
    pub fn to_activity(&self) -> Activity {
        let mut activity = Activity::new(self.activity_type, self.start_time, self.end_time);
        activity.name = self.name.clone();
        activity.stats.distance_meters = self.distance_meters;
        activity.compute_uid();
        activity
    }
}

/// The PowerTraxx provider adapter.
///
/// Translates between the PowerTraxx REST/OAuth API and the canonical
/// activity model. The adapter performs no retries and holds no state beyond
/// the injected token store; sync scheduling and backoff policy belong to
/// the caller.
pub struct PowerTraxxService {
    config: Arc<PowerTraxxConfig>,
    client: Client,
    tokens: TokenManager,
}

impl PowerTraxxService {
    /// Create the adapter over an injected token store.
    #[must_use]
    pub fn new(config: PowerTraxxConfig, store: Arc<TokenStore>) -> Self {
        let config = Arc::new(config);
        let client = Client::new();
        let tokens = TokenManager::new(Arc::clone(&config), client.clone(), store);
        Self {
            config,
            client,
            tokens,
        }
    }

    /// The token lifecycle manager backing this adapter.
    #[must_use]
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Build the user authorization URL for the redirect-based grant start.
    ///
    /// This constructs a URL only; no HTTP call is made.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the client id is empty or the base URL does not
    /// parse.
    pub fn authorization_url(&self) -> ProviderResult<String> {
        if self.config.client_id.is_empty() {
            return Err(ProviderError::InvalidConfig {
                provider: PROVIDER_NAME,
                message: "client id not configured".to_owned(),
            });
        }
        let mut url = Url::parse(&self.config.endpoint(AUTHORIZE_PATH)).map_err(|e| {
            ProviderError::InvalidConfig {
                provider: PROVIDER_NAME,
                message: format!("base URL does not parse: {e}"),
            }
        })?;
        url.query_pairs_mut()
            .append_pair("scope", OAUTH_SCOPE)
            .append_pair("client_id", &self.config.client_id)
            .append_pair("state", OAUTH_STATE)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.config.redirect_uri());
        Ok(url.into())
    }

    /// Exchange an authorization code for a token pair and resolve the
    /// external user id behind it.
    ///
    /// # Errors
    ///
    /// `Authorization` (blocking) on a 4xx token response, `RemoteService`
    /// on other non-200 statuses, `Decode` on unparseable responses,
    /// `Network` on transport failure.
    #[instrument(skip_all, fields(provider = PROVIDER_NAME))]
    pub async fn retrieve_authorization_token(
        &self,
        code: &str,
    ) -> ProviderResult<(String, TokenRecord)> {
        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            return Err(ProviderError::InvalidConfig {
                provider: PROVIDER_NAME,
                message: "client credentials not configured".to_owned(),
            });
        }

        let redirect_uri = self.config.redirect_uri();
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(self.config.endpoint(TOKEN_PATH))
            .form(&params)
            .send()
            .await
            .map_err(api::network_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(api::network_error)?;
        if !(200..300).contains(&status) {
            return Err(api::token_status_error(status, body));
        }
        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|_| ProviderError::Decode {
                provider: PROVIDER_NAME,
                status,
                body,
            })?;
        let record = TokenRecord::from_exchange(
            parsed.access_token,
            parsed.refresh_token,
            parsed.expires_in,
            Utc::now(),
        );

        let user_info: UserInfoResponse = self
            .get_json(
                &self.config.endpoint(USERINFO_PATH),
                &format!("Bearer {}", record.access_token),
                &[],
            )
            .await?;

        Ok((user_info.id, record))
    }

    /// PowerTraxx tokens cannot be revoked; deliberately a no-op.
    pub fn revoke_authorization(&self) {
        debug!(provider = PROVIDER_NAME, "tokens cannot be revoked, skipping");
    }

    /// Drop the account's cached token pair.
    pub async fn delete_cached_data(&self, record: &ServiceRecord) {
        self.tokens.store().remove(record.external_id()).await;
    }

    /// List remote activity summaries.
    ///
    /// With `exhaustive` false a bounded newest-first page is requested for
    /// incremental sync; with `exhaustive` true the full history.
    ///
    /// # Errors
    ///
    /// `Authorization` (blocking) on 401/403, `RemoteService` on other
    /// non-success statuses, `Decode` when the body is not parseable JSON
    /// (carrying the raw status and body), `Network` on transport failure.
    #[instrument(skip(self, record), fields(provider = PROVIDER_NAME, account = record.external_id()))]
    pub async fn download_activity_list(
        &self,
        record: &ServiceRecord,
        exhaustive: bool,
    ) -> ProviderResult<Vec<ActivitySummary>> {
        let header = self.tokens.auth_header(record).await?;
        let query: &[(&str, u32)] = if exhaustive {
            &[]
        } else {
            &[("count", INCREMENTAL_PAGE_SIZE)]
        };
        let records: Vec<SummaryRecord> = self
            .get_json(&self.config.endpoint(ACTIVITY_LIST_PATH), &header, query)
            .await?;

        let mut summaries = Vec::with_capacity(records.len());
        for item in records {
            debug!(activity_id = %item.id, "listed activity");
            let start_time = parse_remote_timestamp(&item.start_date)?;
            let end_time = parse_remote_timestamp(&item.end_date)?;
            summaries.push(ActivitySummary {
                external_id: item.id,
                name: item.name,
                activity_type: activity_type_from_remote(&item.sport_type),
                distance_meters: item.distance,
                start_time,
                end_time,
            });
        }
        Ok(summaries)
    }

    /// Download full detail for a listed activity and decode it into the
    /// canonical model.
    ///
    /// # Errors
    ///
    /// `Authorization` (blocking) on 401/403, `RemoteService` on other
    /// non-success statuses, `Decode` on unparseable detail, `Network` on
    /// transport failure.
    #[instrument(
        skip(self, record, summary),
        fields(provider = PROVIDER_NAME, activity_id = %summary.external_id)
    )]
    pub async fn download_activity(
        &self,
        record: &ServiceRecord,
        summary: &ActivitySummary,
    ) -> ProviderResult<Activity> {
        let header = self.tokens.auth_header(record).await?;
        let url = format!(
            "{}/{}",
            self.config.endpoint(ACTIVITY_PATH),
            summary.external_id
        );
        let detail: DetailRecord = self.get_json(&url, &header, &[]).await?;

        translate::decode_detail(summary.to_activity(), detail).map_err(|e| {
            ProviderError::Decode {
                provider: PROVIDER_NAME,
                status: 200,
                body: format!("invalid point timestamp: {e}"),
            }
        })
    }

    /// Upload a canonical activity, returning the provider's assigned id.
    ///
    /// Activities without a GPS track are sent as a summary (duration, pause,
    /// distance); activities with one as a flat point list.
    ///
    /// # Errors
    ///
    /// `AccountExpired` (blocking) on 401, `RemoteService` on other
    /// non-success statuses with the raw response body, `Decode` when the
    /// creation response is unparseable, `Network` on transport failure.
    #[instrument(skip(self, record, activity), fields(provider = PROVIDER_NAME, uid = ?activity.uid))]
    pub async fn upload_activity(
        &self,
        record: &ServiceRecord,
        activity: &Activity,
    ) -> ProviderResult<String> {
        let header = self.tokens.auth_header(record).await?;
        let request = self
            .client
            .post(self.config.endpoint(ACTIVITY_PATH))
            .header(AUTHORIZATION, header);
        let request = if activity.gps {
            request.json(&translate::track_payload(activity))
        } else {
            request.json(&translate::summary_payload(activity))
        };

        let response = request.send().await.map_err(api::network_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(api::network_error)?;
        if status == 401 {
            // The provider signals subscription/trial expiry with a 401 on
            // upload; block the account until the user intervenes.
            return Err(ProviderError::AccountExpired {
                provider: PROVIDER_NAME,
                body,
            });
        }
        if !(200..300).contains(&status) {
            return Err(ProviderError::RemoteService {
                provider: PROVIDER_NAME,
                status,
                body,
            });
        }
        let parsed: UploadResponse =
            serde_json::from_str(&body).map_err(|_| ProviderError::Decode {
                provider: PROVIDER_NAME,
                status,
                body,
            })?;
        Ok(parsed.activity_id)
    }

    /// Delete a remote activity by its provider-assigned id.
    ///
    /// # Errors
    ///
    /// `RemoteService` on any non-2xx response (no special-casing),
    /// `Network` on transport failure.
    #[instrument(skip(self, record), fields(provider = PROVIDER_NAME, activity_id = remote_id))]
    pub async fn delete_activity(
        &self,
        record: &ServiceRecord,
        remote_id: &str,
    ) -> ProviderResult<()> {
        let header = self.tokens.auth_header(record).await?;
        let url = format!("{}/{remote_id}", self.config.endpoint(ACTIVITY_PATH));
        let response = self
            .client
            .delete(url)
            .header(AUTHORIZATION, header)
            .send()
            .await
            .map_err(api::network_error)?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.map_err(api::network_error)?;
            return Err(ProviderError::RemoteService {
                provider: PROVIDER_NAME,
                status,
                body,
            });
        }
        Ok(())
    }

    /// Bearer-authenticated GET returning decoded JSON, with the shared
    /// status classification applied.
    async fn get_json<T>(
        &self,
        url: &str,
        auth_header: &str,
        query: &[(&str, u32)],
    ) -> ProviderResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut request = self.client.get(url).header(AUTHORIZATION, auth_header);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await.map_err(api::network_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(api::network_error)?;
        if !(200..300).contains(&status) {
            return Err(api::authenticated_status_error(status, body));
        }
        serde_json::from_str(&body).map_err(|_| ProviderError::Decode {
            provider: PROVIDER_NAME,
            status,
            body,
        })
    }
}

fn parse_remote_timestamp(value: &str) -> ProviderResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ProviderError::Decode {
            provider: PROVIDER_NAME,
            status: 200,
            body: format!("invalid timestamp {value:?}: {e}"),
        })
}
