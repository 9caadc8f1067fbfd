// ABOUTME: Canonical cross-provider interchange model for the FitSync platform
// ABOUTME: Shared activity/lap/waypoint types, sport taxonomy, and provider error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

//! Canonical activity interchange model shared by every provider adapter.
//!
//! Adapters translate between a remote provider's wire schema and the types
//! in this crate. A [`models::Activity`] is created per sync operation, fully
//! populated in one pass, and handed back to the caller; this crate holds no
//! long-term ownership of activity data.

/// Shared provider error taxonomy
pub mod errors;
/// Canonical activity, lap, waypoint, and sport types
pub mod models;

pub use errors::{ProviderError, ProviderResult};
pub use models::{
    Activity, ActivityStatistics, ActivityType, Lap, Location, Waypoint, WaypointKind,
};
