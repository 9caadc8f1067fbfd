// ABOUTME: Structured error types for provider adapter operations
// ABOUTME: Classifies failures into blocking, retryable, and decode categories
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

//! Error taxonomy shared by all provider adapters.
//!
//! Every failure surfaces to the sync scheduler as a typed error carrying the
//! offending HTTP status and raw body for diagnostics; nothing is swallowed.
//! Errors for which [`ProviderError::blocks_sync`] returns `true` must stop
//! further sync attempts for the account until the user re-authorizes —
//! continuing to call an expired-credential endpoint wastes quota and can
//! trigger provider-side throttling.

use thiserror::Error;

/// An error produced while talking to a remote fitness provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider returned a body that could not be decoded as the expected
    /// JSON shape. Not retryable without a provider-side fix.
    #[error("[{provider}] could not decode response (status {status}): {body}")]
    Decode {
        /// Adapter that produced the error
        provider: &'static str,
        /// HTTP status of the offending response
        status: u16,
        /// Raw response body, for diagnostics
        body: String,
    },

    /// Credentials are expired or invalid. Blocks the account and requires
    /// user re-authorization.
    #[error("[{provider}] authorization rejected (status {status}): {body}")]
    Authorization {
        /// Adapter that produced the error
        provider: &'static str,
        /// HTTP status of the offending response
        status: u16,
        /// Raw response body, for diagnostics
        body: String,
    },

    /// The remote account's subscription or trial has lapsed. Same blocking
    /// treatment as [`ProviderError::Authorization`].
    #[error("[{provider}] account or subscription expired: {body}")]
    AccountExpired {
        /// Adapter that produced the error
        provider: &'static str,
        /// Raw response body, for diagnostics
        body: String,
    },

    /// Any other non-success HTTP status. The caller may retry per its own
    /// backoff policy; the adapter itself never retries.
    #[error("[{provider}] remote service error (status {status}): {body}")]
    RemoteService {
        /// Adapter that produced the error
        provider: &'static str,
        /// HTTP status of the offending response
        status: u16,
        /// Raw response body, for diagnostics
        body: String,
    },

    /// Transport-level failure (connection refused, timeout, TLS, ...).
    #[error("[{provider}] network error: {source}")]
    Network {
        /// Adapter that produced the error
        provider: &'static str,
        /// Underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The adapter was constructed with unusable configuration
    /// (empty client id, malformed base URL, ...).
    #[error("[{provider}] invalid configuration: {message}")]
    InvalidConfig {
        /// Adapter that produced the error
        provider: &'static str,
        /// What is wrong with the configuration
        message: String,
    },
}

impl ProviderError {
    /// True when the user must re-authorize before sync can continue.
    #[must_use]
    pub const fn intervention_required(&self) -> bool {
        matches!(self, Self::Authorization { .. } | Self::AccountExpired { .. })
    }

    /// True when further sync attempts for the account must be blocked until
    /// the user intervenes.
    #[must_use]
    pub const fn blocks_sync(&self) -> bool {
        self.intervention_required()
    }

    /// True when the operation may be retried at the caller's discretion.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteService { .. } | Self::Network { .. })
    }

    /// HTTP status of the offending response, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Decode { status, .. }
            | Self::Authorization { status, .. }
            | Self::RemoteService { status, .. } => Some(*status),
            Self::AccountExpired { .. } | Self::Network { .. } | Self::InvalidConfig { .. } => None,
        }
    }
}

/// A specialized Result type for provider adapter operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
