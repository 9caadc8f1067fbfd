// ABOUTME: Canonical activity models including Activity, Lap, Waypoint, and Location
// ABOUTME: Waypoint classification tags and content-hash UID computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ActivityType;

/// Classification tag for a waypoint within a lap.
///
/// Tags are always derived by the adapter from the flat point stream; no
/// provider supplies them directly. Within a non-stationary activity the
/// first waypoint is `Start` and the last is `End`, overriding whatever tag
/// the pause/resume inference assigned at those boundaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    /// Ordinary in-motion sample
    Regular,
    /// Recording was paused at this sample
    Pause,
    /// First in-motion sample after a pause
    Resume,
    /// First waypoint of a non-stationary activity
    Start,
    /// Last waypoint of a non-stationary activity
    End,
}

/// Geographic position of a waypoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Elevation in meters, when the provider supplies it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

/// A single recorded sample within a lap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Waypoint {
    /// When the sample was recorded (UTC)
    pub timestamp: DateTime<Utc>,
    /// Derived classification tag
    pub kind: WaypointKind,
    /// Position, when the sample carries GPS data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Heart rate in BPM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,
    /// Cadence in RPM
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    /// Run cadence in steps per minute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_cadence: Option<f64>,
    /// Power in watts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    /// Speed in meters per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Cumulative distance in meters since the start of the activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Waypoint {
    /// Create a bare waypoint with no measurements attached.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, kind: WaypointKind) -> Self {
        Self {
            timestamp,
            kind,
            location: None,
            heart_rate: None,
            cadence: None,
            run_cadence: None,
            power: None,
            speed: None,
            distance: None,
        }
    }

    /// True when the waypoint carries a usable lat/lon pair.
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.location.is_some()
    }
}

/// One lap of an activity, holding a time-ordered waypoint sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lap {
    /// When the lap started (UTC)
    pub start_time: DateTime<Utc>,
    /// When the lap ended (UTC)
    pub end_time: DateTime<Utc>,
    /// Time-ordered samples within the lap
    pub waypoints: Vec<Waypoint>,
}

impl Lap {
    /// Create an empty lap spanning the given time bounds.
    #[must_use]
    pub const fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            waypoints: Vec::new(),
        }
    }
}

/// Summary statistics attached to an activity.
///
/// All values are optional; adapters copy whatever the provider declares and
/// never infer missing statistics from the waypoint stream.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityStatistics {
    /// Total distance in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// Elapsed timer time in seconds (includes pauses the device recorded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer_time_seconds: Option<f64>,
    /// Moving time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_time_seconds: Option<f64>,
}

/// The canonical cross-provider representation of a single recorded workout.
///
/// Instances are created per sync operation (download or upload), fully
/// populated in one pass, and discarded once the caller persists or uploads
/// them. They are exclusively owned by the calling pass and never shared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Content-hash identity, set by [`Activity::compute_uid`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Human-readable title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form notes/comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Canonical sport type
    pub activity_type: ActivityType,
    /// When the activity started (UTC)
    pub start_time: DateTime<Utc>,
    /// When the activity ended (UTC)
    pub end_time: DateTime<Utc>,
    /// Whether the activity carries a GPS track
    pub gps: bool,
    /// Whether the activity is private on the remote service
    pub private: bool,
    /// True when the activity has no meaningful movement track (<= 1 waypoint)
    pub stationary: bool,
    /// Declared summary statistics
    pub stats: ActivityStatistics,
    /// One or more laps, each with a time-ordered waypoint sequence
    pub laps: Vec<Lap>,
}

impl Activity {
    /// Create an activity shell with the given type and time bounds.
    #[must_use]
    pub fn new(
        activity_type: ActivityType,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            uid: None,
            name: None,
            notes: None,
            activity_type,
            start_time,
            end_time,
            gps: false,
            private: false,
            stationary: false,
            stats: ActivityStatistics::default(),
            laps: Vec::new(),
        }
    }

    /// Iterate waypoints across all laps in order.
    pub fn flat_waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.laps.iter().flat_map(|lap| lap.waypoints.iter())
    }

    /// Total number of waypoints across all laps.
    #[must_use]
    pub fn total_waypoints(&self) -> usize {
        self.laps.iter().map(|lap| lap.waypoints.len()).sum()
    }

    /// Compute and store the content-hash UID.
    ///
    /// The hash covers sport type, time bounds, and declared distance rounded
    /// to whole meters, so the same workout fetched twice (or from two
    /// providers reporting slightly different distance precision) produces
    /// the same identity.
    pub fn compute_uid(&mut self) {
        let distance = self
            .stats
            .distance_meters
            .map_or_else(|| "-".to_owned(), |d| format!("{}", d.round() as i64));
        let material = format!(
            "{}|{}|{}|{}",
            self.activity_type,
            self.start_time.timestamp(),
            self.end_time.timestamp(),
            distance
        );
        let digest = Sha256::digest(material.as_bytes());
        self.uid = Some(hex::encode(&digest[..16]));
    }
}
