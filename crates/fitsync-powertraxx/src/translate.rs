// ABOUTME: Bidirectional translation between PowerTraxx JSON and the canonical activity model
// ABOUTME: Waypoint tagging state machine, unit conversion, and upload payload construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use chrono::{DateTime, Utc};
use fitsync_core::{Activity, Lap, Location, Waypoint, WaypointKind};

use crate::api::{DetailRecord, SummaryUpload, TrackMetadata, TrackPoint, TrackUpload};
use crate::constants::KMH_PER_MS;
use crate::sport::remote_code_for;

/// Populate a canonical activity stub from a remote detail record.
///
/// Builds exactly one lap spanning the full activity. Waypoint tags are
/// derived in a single pass carrying the previous tag: a non-null pause
/// marker tags the point `Pause`, the first point after a pause tags
/// `Resume`, everything else `Regular`. After the stream is built, an
/// activity with at most one waypoint is marked stationary; otherwise the
/// boundary waypoints are forced to `Start`/`End`, overriding whatever the
/// pause inference assigned there.
///
/// # Errors
///
/// Returns the parse error for a point timestamp that is not valid RFC 3339.
pub(crate) fn decode_detail(
    mut activity: Activity,
    detail: DetailRecord,
) -> Result<Activity, chrono::ParseError> {
    if let Some(comment) = detail.comment.filter(|c| !c.is_empty()) {
        activity.notes = Some(comment);
    }
    activity.gps = detail.has_gps;
    activity.private = !detail.is_public;

    let mut lap = Lap::new(activity.start_time, activity.end_time);
    let mut previous: Option<WaypointKind> = None;
    for point in detail.points {
        let timestamp = DateTime::parse_from_rfc3339(&point.time_stamp)?.with_timezone(&Utc);
        let kind = if point.pause.is_some() {
            WaypointKind::Pause
        } else if previous == Some(WaypointKind::Pause) {
            WaypointKind::Resume
        } else {
            WaypointKind::Regular
        };

        let mut waypoint = Waypoint::new(timestamp, kind);
        waypoint.distance = point.distance;
        if let (Some(latitude), Some(longitude)) = (point.lat, point.lon) {
            waypoint.location = Some(Location {
                latitude,
                longitude,
                altitude: point.elevation,
            });
        }
        waypoint.power = point.power;
        waypoint.cadence = point.cadence;
        waypoint.run_cadence = point.steps;
        waypoint.speed = point.speed.map(|kmh| kmh / KMH_PER_MS);
        waypoint.heart_rate = point.heartrate;

        previous = Some(kind);
        lap.waypoints.push(waypoint);
    }
    activity.laps = vec![lap];

    activity.stationary = activity.total_waypoints() <= 1;
    if !activity.stationary {
        // Start/End take precedence over the pause inference at the bounds.
        if let Some(lap) = activity.laps.first_mut() {
            if let Some(first) = lap.waypoints.first_mut() {
                first.kind = WaypointKind::Start;
            }
            if let Some(last) = lap.waypoints.last_mut() {
                last.kind = WaypointKind::End;
            }
        }
    }

    Ok(activity)
}

/// Duration for summary-mode uploads: declared timer time, else moving time,
/// else the wall-clock span.
pub(crate) fn resolve_duration_seconds(activity: &Activity) -> f64 {
    if let Some(timer) = activity.stats.timer_time_seconds {
        return timer;
    }
    if let Some(moving) = activity.stats.moving_time_seconds {
        return moving;
    }
    (activity.end_time - activity.start_time).num_seconds() as f64
}

/// Pause time for summary-mode uploads: timer minus moving when both
/// statistics are declared, zero otherwise (deliberately not inferred from a
/// single statistic).
pub(crate) fn resolve_pause_seconds(activity: &Activity) -> f64 {
    match (
        activity.stats.timer_time_seconds,
        activity.stats.moving_time_seconds,
    ) {
        (Some(timer), Some(moving)) => timer - moving,
        _ => 0.0,
    }
}

/// Build the summary-mode payload for an activity without a GPS track.
pub(crate) fn summary_payload(activity: &Activity) -> SummaryUpload {
    SummaryUpload {
        name: activity.name.clone(),
        comment: activity.notes.clone(),
        date: activity.start_time.to_rfc3339(),
        share: !activity.private,
        duration: resolve_duration_seconds(activity),
        pause: resolve_pause_seconds(activity),
        sport_type: remote_code_for(activity.activity_type),
        distance: activity.stats.distance_meters,
    }
}

/// Build the GPS-mode payload: metadata plus one point per flattened
/// waypoint across all laps, with absent measurements omitted.
pub(crate) fn track_payload(activity: &Activity) -> TrackUpload {
    let metadata = TrackMetadata {
        name: activity.name.clone().filter(|n| !n.is_empty()),
        comment: activity.notes.clone().filter(|n| !n.is_empty()),
        indoor: activity.stationary.then_some(true),
        sport_type: remote_code_for(activity.activity_type),
    };
    TrackUpload {
        activity: metadata,
        points: activity.flat_waypoints().map(track_point).collect(),
        start_time: activity.start_time.to_rfc3339(),
        share: !activity.private,
    }
}

fn track_point(waypoint: &Waypoint) -> TrackPoint {
    TrackPoint {
        lat: waypoint.location.map(|l| l.latitude),
        lon: waypoint.location.map(|l| l.longitude),
        ele: waypoint.location.and_then(|l| l.altitude),
        timestamp_value: Some(waypoint.timestamp.timestamp()),
        heartrate: waypoint.heart_rate,
        speed: waypoint.speed,
        distance: waypoint.distance,
        cadence: waypoint.cadence,
        steps: waypoint.run_cadence,
        power: waypoint.power,
    }
}
