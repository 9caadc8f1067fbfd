// ABOUTME: Externally-supplied configuration for the PowerTraxx adapter
// ABOUTME: OAuth client credentials, provider base URL, and redirect base URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use crate::constants::PROVIDER_NAME;

/// Configuration for the PowerTraxx integration.
///
/// All values are supplied by the hosting platform; the adapter owns none of
/// them. `base_url` points at the provider API root (no trailing slash
/// required), `redirect_base` at the platform's public web root used to build
/// the OAuth return URI.
#[derive(Debug, Clone)]
pub struct PowerTraxxConfig {
    /// OAuth client ID issued by PowerTraxx
    pub client_id: String,
    /// OAuth client secret issued by PowerTraxx
    pub client_secret: String,
    /// Provider API base URL
    pub base_url: String,
    /// Platform web root for the OAuth redirect URI
    pub redirect_base: String,
}

impl PowerTraxxConfig {
    /// Create a configuration, normalizing trailing slashes on the URLs.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        base_url: impl Into<String>,
        redirect_base: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        let redirect_base: String = redirect_base.into();
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            redirect_base: redirect_base.trim_end_matches('/').to_owned(),
        }
    }

    /// Absolute URL for an API path on the provider.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// OAuth return URI registered with the provider.
    #[must_use]
    pub fn redirect_uri(&self) -> String {
        format!("{}/oauth/return/{PROVIDER_NAME}", self.redirect_base)
    }
}
