// ABOUTME: Sport-type mapping tables between PowerTraxx codes and the canonical taxonomy
// ABOUTME: Two one-way lookups; the mapping is many-to-one and not invertible
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use fitsync_core::ActivityType;

/// Map a remote sport-type string onto the canonical taxonomy.
///
/// Every known code resolves; unknown codes fall back to
/// [`ActivityType::Other`]. Note `bicycle` and `racingbicycle` both map to
/// [`ActivityType::Cycling`], which is why the reverse direction is a
/// separate table rather than an inverse of this one.
#[must_use]
pub fn activity_type_from_remote(code: &str) -> ActivityType {
    match code {
        "run" => ActivityType::Running,
        "bicycle" | "racingbicycle" => ActivityType::Cycling,
        "mountainbike" => ActivityType::MountainBiking,
        "walking" => ActivityType::Walking,
        "hike" => ActivityType::Hiking,
        "snowboard" => ActivityType::Snowboarding,
        "skialpin" => ActivityType::DownhillSkiing,
        "classicskiing" => ActivityType::CrossCountrySkiing,
        "skating" => ActivityType::Skating,
        "swim" => ActivityType::Swimming,
        "elliptical" => ActivityType::Elliptical,
        _ => ActivityType::Other,
    }
}

/// Map a canonical activity type onto the numeric sport code PowerTraxx
/// expects in upload payloads.
#[must_use]
pub const fn remote_code_for(activity_type: ActivityType) -> u32 {
    match activity_type {
        ActivityType::Running => 4,
        ActivityType::Cycling => 3,
        ActivityType::MountainBiking => 2,
        ActivityType::Walking => 9,
        ActivityType::Hiking => 5,
        ActivityType::CrossCountrySkiing => 12,
        ActivityType::DownhillSkiing => 13,
        ActivityType::Snowboarding => 22,
        ActivityType::Skating => 11,
        ActivityType::Swimming => 6,
        ActivityType::Elliptical => 10,
        ActivityType::Other => 99,
    }
}
