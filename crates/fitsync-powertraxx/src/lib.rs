// ABOUTME: PowerTraxx provider adapter for the FitSync platform
// ABOUTME: OAuth token lifecycle, activity translation engine, upload/delete gateway
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

//! PowerTraxx provider adapter.
//!
//! Translates between the PowerTraxx REST/OAuth API and the canonical
//! [`fitsync_core`] activity model. The two load-bearing pieces are the
//! token lifecycle manager ([`token::TokenManager`] — cached, expiry-buffered
//! access tokens with single-flight refresh per account) and the translation
//! engine ([`provider::PowerTraxxService::download_activity`] /
//! [`provider::PowerTraxxService::upload_activity`] — field-by-field mapping
//! including the pause/resume/start/end waypoint tagging).
//!
//! The adapter decides nothing about sync frequency, deduplicates nothing,
//! and persists nothing beyond the injected in-memory token store.

/// Caller-owned account binding
pub mod account;
mod api;
/// Externally-supplied adapter configuration
pub mod config;
/// Endpoint paths and tuning constants
pub mod constants;
/// Service operations: OAuth handshake, list, download, upload, delete
pub mod provider;
/// Sport-type mapping tables
pub mod sport;
/// Token store and lifecycle manager
pub mod token;
mod translate;

pub use account::ServiceRecord;
pub use config::PowerTraxxConfig;
pub use provider::{ActivitySummary, PowerTraxxService};
pub use sport::{activity_type_from_remote, remote_code_for};
pub use token::{TokenManager, TokenRecord, TokenStore};
