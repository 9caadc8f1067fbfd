// ABOUTME: Canonical data models shared across provider adapters
// ABOUTME: Re-exports activity, lap, waypoint, and sport taxonomy types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

/// Activity, lap, and waypoint types
pub mod activity;
/// Fixed sport taxonomy
pub mod sport;

pub use activity::{Activity, ActivityStatistics, Lap, Location, Waypoint, WaypointKind};
pub use sport::ActivityType;
