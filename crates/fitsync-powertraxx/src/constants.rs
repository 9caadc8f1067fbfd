// ABOUTME: Endpoint paths and tuning constants for the PowerTraxx adapter
// ABOUTME: Page size, token expiry buffer, OAuth scope/state values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

/// Adapter name used in error reporting and logging
pub const PROVIDER_NAME: &str = "powertraxx";

/// Redirect-based authorization grant start (URL construction only)
pub const AUTHORIZE_PATH: &str = "/authorize";

/// Token endpoint for authorization-code and refresh-token grants
pub const TOKEN_PATH: &str = "/token";

/// Bearer-authenticated account info endpoint, returns `{Id}`
pub const USERINFO_PATH: &str = "/api/account/userinfo";

/// Activity summary listing endpoint
pub const ACTIVITY_LIST_PATH: &str = "/api/activity/list";

/// Activity detail / creation / deletion endpoint root
pub const ACTIVITY_PATH: &str = "/api/activity";

/// OAuth scope requested during authorization
pub const OAUTH_SCOPE: &str = "activity";

/// Fixed state parameter sent with the authorization redirect
pub const OAUTH_STATE: &str = "ptr_api";

/// Page size requested for incremental (non-exhaustive) list calls,
/// newest-first
pub const INCREMENTAL_PAGE_SIZE: u32 = 25;

/// Seconds subtracted from the provider-declared token lifetime so a token
/// never expires mid-request
pub const TOKEN_EXPIRY_BUFFER_SECS: i64 = 30;

/// Remote point speeds arrive in km/h; canonical waypoints use m/s
pub const KMH_PER_MS: f64 = 3.6;
