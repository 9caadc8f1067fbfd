// ABOUTME: Fixed sport taxonomy for canonical activities
// ABOUTME: Adapters map provider-specific codes onto these variants, defaulting to Other
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitSync contributors

use serde::{Deserialize, Serialize};

/// Enumeration of the sport types in the canonical taxonomy.
///
/// Provider adapters map their own sport codes onto these variants through
/// per-adapter lookup tables; codes with no mapping fall back to
/// [`ActivityType::Other`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Running activity
    Running,
    /// Road or generic cycling activity
    Cycling,
    /// Mountain biking activity
    MountainBiking,
    /// Walking activity
    Walking,
    /// Hiking activity
    Hiking,
    /// Cross-country skiing
    CrossCountrySkiing,
    /// Alpine/downhill skiing
    DownhillSkiing,
    /// Snowboarding activity
    Snowboarding,
    /// Ice or inline skating
    Skating,
    /// Swimming activity
    Swimming,
    /// Elliptical trainer session
    Elliptical,
    /// Any activity not covered by the taxonomy
    Other,
}

impl ActivityType {
    /// Every variant in the taxonomy, for exhaustive table checks.
    pub const ALL: [Self; 12] = [
        Self::Running,
        Self::Cycling,
        Self::MountainBiking,
        Self::Walking,
        Self::Hiking,
        Self::CrossCountrySkiing,
        Self::DownhillSkiing,
        Self::Snowboarding,
        Self::Skating,
        Self::Swimming,
        Self::Elliptical,
        Self::Other,
    ];

    /// Stable lowercase name, used in UID computation and logging.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::MountainBiking => "mountain_biking",
            Self::Walking => "walking",
            Self::Hiking => "hiking",
            Self::CrossCountrySkiing => "cross_country_skiing",
            Self::DownhillSkiing => "downhill_skiing",
            Self::Snowboarding => "snowboarding",
            Self::Skating => "skating",
            Self::Swimming => "swimming",
            Self::Elliptical => "elliptical",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
