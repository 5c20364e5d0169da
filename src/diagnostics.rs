//! Engineering diagnostics.
//!
//! Advisory only: nothing here blocks a layout. Each check derives its
//! warnings independently and callers collect them in insertion order.

use crate::float_types::Real;
use crate::links::LinkCount;
use crate::path::BeltPath;
use crate::pulley::PulleyRole;
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Center distances shorter than this many pitches get flagged.
pub const RECOMMENDED_CENTER_MIN_PITCHES: Real = 30.0;
/// Center distances longer than this many pitches get flagged.
pub const RECOMMENDED_CENTER_MAX_PITCHES: Real = 50.0;
/// Wrap angles below this many degrees reduce tooth engagement.
pub const MIN_RECOMMENDED_WRAP_DEGREES: Real = 120.0;

/// A tagged advisory; [`Display`] renders the user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EngineeringWarning {
    /// Center distance fell outside the recommended pitch band.
    CenterDistanceOutsideRecommended {
        /// Center distance expressed in belt pitches.
        pitches: Real,
    },
    /// Belt contact on one pulley is below the engagement threshold.
    LowWrapAngle {
        /// Which pulley is under-wrapped.
        role: PulleyRole,
        /// Its wrap angle in degrees.
        degrees: Real,
    },
    /// Even-count enforcement bumped an odd element count.
    EvenCountAdjusted {
        /// Count before the bump.
        raw: u32,
        /// Count after the bump.
        adjusted: u32,
    },
    /// The final element count is odd and needs phase indexing.
    OddCountPhaseIndexing {
        /// Equal tooth counts make the symmetric case more sensitive.
        equal_pulleys: bool,
    },
}

impl Display for EngineeringWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineeringWarning::CenterDistanceOutsideRecommended { pitches } => write!(
                f,
                "Center distance is {pitches:.2} pitches. Recommended range is \
                 {RECOMMENDED_CENTER_MIN_PITCHES:.0}-{RECOMMENDED_CENTER_MAX_PITCHES:.0} pitches \
                 (ISO 606 / ANSI B29.1 common practice)."
            ),
            EngineeringWarning::LowWrapAngle { role, degrees } => {
                let name = match role {
                    PulleyRole::Drive => "Drive",
                    PulleyRole::Driven => "Driven",
                };
                write!(
                    f,
                    "{name} pulley wrap angle is {degrees:.2} deg; low wrap can reduce tooth \
                     engagement under load."
                )
            },
            EngineeringWarning::EvenCountAdjusted { raw, adjusted } => write!(
                f,
                "Belt tooth count adjusted from {raw} to {adjusted} to keep an even count."
            ),
            EngineeringWarning::OddCountPhaseIndexing { equal_pulleys: true } => write!(
                f,
                "Odd belt tooth count with equal pulleys can require phase indexing during \
                 installation."
            ),
            EngineeringWarning::OddCountPhaseIndexing {
                equal_pulleys: false,
            } => write!(
                f,
                "Odd belt tooth count can require phase indexing during installation."
            ),
        }
    }
}

/// Flag a center distance outside the recommended `[30, 50]`-pitch band.
#[must_use]
pub fn center_distance_warnings(
    center_distance: Real,
    belt_pitch: Real,
) -> Vec<EngineeringWarning> {
    let mut warnings = Vec::new();
    if belt_pitch <= 0.0 {
        return warnings;
    }

    let pitches = center_distance / belt_pitch;
    if !(RECOMMENDED_CENTER_MIN_PITCHES..=RECOMMENDED_CENTER_MAX_PITCHES).contains(&pitches) {
        warnings.push(EngineeringWarning::CenterDistanceOutsideRecommended { pitches });
    }

    warnings
}

/// Flag either pulley whose wrap angle is below 120 degrees. Drive first.
#[must_use]
pub fn wrap_angle_warnings(path: &BeltPath) -> Vec<EngineeringWarning> {
    let mut warnings = Vec::new();
    for role in [PulleyRole::Drive, PulleyRole::Driven] {
        let degrees = path.wrap_degrees(role);
        if degrees < MIN_RECOMMENDED_WRAP_DEGREES {
            warnings.push(EngineeringWarning::LowWrapAngle { role, degrees });
        }
    }
    warnings
}

/// Note for a count bumped by even enforcement.
#[must_use]
pub fn even_adjustment_note(count: &LinkCount) -> Option<EngineeringWarning> {
    count.even_adjusted.then_some(EngineeringWarning::EvenCountAdjusted {
        raw: count.raw,
        adjusted: count.adjusted,
    })
}

/// Note for an odd final count, with a sharper wording when the two
/// pulleys have equal tooth counts (the symmetric case is more sensitive
/// to phase).
#[must_use]
pub fn phase_indexing_note(
    count: &LinkCount,
    drive_teeth: u32,
    driven_teeth: u32,
) -> Option<EngineeringWarning> {
    count
        .requires_phase_indexing()
        .then_some(EngineeringWarning::OddCountPhaseIndexing {
            equal_pulleys: drive_teeth == driven_teeth,
        })
}
