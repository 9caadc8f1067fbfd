// ABOUTME: Wire DTOs matching the PowerTraxx JSON schema exactly
// ABOUTME: Token/userinfo responses, activity summaries and detail, upload payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use fitsync_core::ProviderError;
use serde::{Deserialize, Serialize};

use crate::constants::PROVIDER_NAME;

/// Token endpoint response for both authorization-code and refresh grants
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Declared lifetime in seconds
    pub expires_in: i64,
}

/// `GET /api/account/userinfo` response
#[derive(Debug, Deserialize)]
pub(crate) struct UserInfoResponse {
    #[serde(rename = "Id")]
    pub id: String,
}

/// One entry of the `GET /api/activity/list` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SummaryRecord {
    pub id: String,
    pub sport_type: String,
    pub distance: Option<f64>,
    pub start_date: String,
    pub end_date: String,
    pub name: Option<String>,
}

/// `GET /api/activity/{id}` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DetailRecord {
    pub comment: Option<String>,
    pub has_gps: bool,
    pub is_public: bool,
    #[serde(default)]
    pub points: Vec<PointRecord>,
}

/// One sample of the remote point stream.
///
/// `pause` is an opaque marker: any non-null value means recording was paused
/// at this sample. Speeds arrive in km/h.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct PointRecord {
    pub time_stamp: String,
    pub distance: Option<f64>,
    pub pause: Option<serde_json::Value>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub elevation: Option<f64>,
    pub power: Option<f64>,
    pub cadence: Option<f64>,
    pub steps: Option<f64>,
    pub speed: Option<f64>,
    pub heartrate: Option<f64>,
}

/// Summary-mode upload payload for activities without a GPS track
#[derive(Debug, Serialize)]
pub(crate) struct SummaryUpload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// ISO 8601 start time
    pub date: String,
    /// Inverse of the canonical private flag
    pub share: bool,
    /// Resolved duration in seconds
    pub duration: f64,
    /// Resolved pause time in seconds
    pub pause: f64,
    #[serde(rename = "sportType")]
    pub sport_type: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// GPS-mode upload payload: activity metadata plus a flat point list
#[derive(Debug, Serialize)]
pub(crate) struct TrackUpload {
    pub activity: TrackMetadata,
    #[serde(rename = "activityRawFormatList")]
    pub points: Vec<TrackPoint>,
    pub start_time: String,
    pub share: bool,
}

/// Metadata object inside the GPS-mode payload
#[derive(Debug, Serialize)]
pub(crate) struct TrackMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indoor: Option<bool>,
    #[serde(rename = "sportType")]
    pub sport_type: u32,
}

/// One flattened waypoint in the GPS-mode payload.
///
/// Absent measurements are omitted rather than sent as null or zero.
#[derive(Debug, Default, Serialize)]
pub(crate) struct TrackPoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ele: Option<f64>,
    /// Epoch seconds, UTC
    #[serde(rename = "timestampValue", skip_serializing_if = "Option::is_none")]
    pub timestamp_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
}

/// Activity-creation response carrying the provider's assigned id
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(rename = "AcId")]
    pub activity_id: String,
}

/// Map a transport failure onto the shared error taxonomy.
pub(crate) fn network_error(source: reqwest::Error) -> ProviderError {
    ProviderError::Network {
        provider: PROVIDER_NAME,
        source: Box::new(source),
    }
}

/// Classify a non-success status from the token endpoint. Any 4xx means the
/// presented grant is no longer usable and the account must be blocked until
/// the user re-authorizes; everything else is a retryable remote failure.
pub(crate) fn token_status_error(status: u16, body: String) -> ProviderError {
    if (400..500).contains(&status) {
        ProviderError::Authorization {
            provider: PROVIDER_NAME,
            status,
            body,
        }
    } else {
        ProviderError::RemoteService {
            provider: PROVIDER_NAME,
            status,
            body,
        }
    }
}

/// Classify a non-success status on a bearer-authenticated read: 401/403 mean
/// the credentials are no longer accepted and the account must be blocked.
pub(crate) fn authenticated_status_error(status: u16, body: String) -> ProviderError {
    if status == 401 || status == 403 {
        ProviderError::Authorization {
            provider: PROVIDER_NAME,
            status,
            body,
        }
    } else {
        ProviderError::RemoteService {
            provider: PROVIDER_NAME,
            status,
            body,
        }
    }
}
