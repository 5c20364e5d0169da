//! Belt link/tooth count determination and the belt-length relationship.
//!
//! The auto mode turns a loop length and target pitch into an integer
//! element count. Rounding at exact `.5` boundaries is half-to-even,
//! which keeps the even/odd decision stable against the optional
//! even-count enforcement. The inverse relationship -- recovering a
//! center distance from a chosen link count -- uses the standard
//! open-belt length approximation
//! `L = 2m + (z1 + z2)/2 + (z2 - z1)^2 / (4 pi^2 m)` with `m = C/p`.

use crate::float_types::{PI, Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fewest belt elements that still form a stable loop.
pub const MIN_LINK_COUNT: u32 = 10;

/// Where the belt element count comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LinkCountSource {
    /// Derive from loop length and target pitch.
    Auto,
    /// Use the caller's count verbatim (validated to be at least
    /// [`MIN_LINK_COUNT`]).
    Manual(u32),
}

/// Result of link-count determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkCount {
    /// Count before even enforcement.
    pub raw: u32,
    /// Final count after even enforcement.
    pub adjusted: u32,
    /// Whether enforcement bumped an odd raw count.
    pub even_adjusted: bool,
}

impl LinkCount {
    /// An odd final count needs a half/offset element and phase indexing
    /// at installation.
    #[must_use]
    pub const fn requires_phase_indexing(&self) -> bool {
        self.adjusted % 2 != 0
    }
}

/// Round with ties going to the even neighbor (banker's rounding).
fn round_half_even(x: Real) -> Real {
    let rounded = x.round();
    if (x.fract().abs() - 0.5).abs() > Real::EPSILON {
        return rounded;
    }
    // Exact half: `round` went away from zero; step back if that
    // neighbor is odd.
    if rounded % 2.0 == 0.0 {
        rounded
    } else {
        rounded - x.signum()
    }
}

/// Determine the belt element count for a loop of `total_length` at
/// `belt_pitch` spacing.
///
/// Auto mode floors the result at [`MIN_LINK_COUNT`]; manual counts pass
/// through unchanged (input validation enforces their lower bound). With
/// `enforce_even`, an odd count is bumped up by one and flagged.
#[must_use]
pub fn determine_link_count(
    total_length: Real,
    belt_pitch: Real,
    source: LinkCountSource,
    enforce_even: bool,
) -> LinkCount {
    let raw = match source {
        LinkCountSource::Auto => {
            let rounded = round_half_even(total_length / belt_pitch).max(0.0) as u32;
            rounded.max(MIN_LINK_COUNT)
        },
        LinkCountSource::Manual(requested) => requested,
    };

    if enforce_even && raw % 2 != 0 {
        LinkCount {
            raw,
            adjusted: raw + 1,
            even_adjusted: true,
        }
    } else {
        LinkCount {
            raw,
            adjusted: raw,
            even_adjusted: false,
        }
    }
}

/// Center distance producing a loop of `belt_links` pitches around the
/// given tooth pair.
///
/// Solves the belt-length quadratic for `m = C/p`; `None` when the link
/// count is too short for the tooth pair (negative discriminant) or both
/// roots are non-positive.
#[must_use]
pub fn center_distance_from_belt_links(
    belt_links: u32,
    drive_teeth: u32,
    driven_teeth: u32,
    belt_pitch: Real,
) -> Option<Real> {
    let links = belt_links as Real;
    let avg_teeth = (drive_teeth as Real + driven_teeth as Real) / 2.0;
    let tooth_delta = driven_teeth as Real - drive_teeth as Real;
    let tooth_delta_term = tooth_delta * tooth_delta / (4.0 * PI * PI);

    let half = links - avg_teeth;
    let discriminant = half * half - 8.0 * tooth_delta_term;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let m = ((half + sqrt_disc) / 4.0).max((half - sqrt_disc) / 4.0);
    if m <= 0.0 {
        return None;
    }

    Some(m * belt_pitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn auto_count_even_case() {
        // 635.0 / 12.7 = 50 exactly: even, no adjustment.
        let count = determine_link_count(635.0, 12.7, LinkCountSource::Auto, true);
        assert_eq!(count.raw, 50);
        assert_eq!(count.adjusted, 50);
        assert!(!count.even_adjusted);
        assert!(!count.requires_phase_indexing());
    }

    #[test]
    fn auto_count_odd_is_bumped() {
        // 622.3 / 12.7 = 49: odd raw, enforcement bumps to 50.
        let count = determine_link_count(622.3, 12.7, LinkCountSource::Auto, true);
        assert_eq!(count.raw, 49);
        assert_eq!(count.adjusted, 50);
        assert!(count.even_adjusted);
    }

    #[test]
    fn odd_without_enforcement_needs_phase_indexing() {
        let count = determine_link_count(622.3, 12.7, LinkCountSource::Auto, false);
        assert_eq!(count.adjusted, 49);
        assert!(count.requires_phase_indexing());
    }

    #[test]
    fn auto_count_floors_at_minimum() {
        let count = determine_link_count(5.0, 12.7, LinkCountSource::Auto, false);
        assert_eq!(count.raw, MIN_LINK_COUNT);
    }

    #[test]
    fn manual_count_passes_through() {
        let count = determine_link_count(635.0, 12.7, LinkCountSource::Manual(121), true);
        assert_eq!(count.raw, 121);
        assert_eq!(count.adjusted, 122);
        assert!(count.even_adjusted);
    }

    #[test]
    fn half_ties_round_to_even() {
        assert_relative_eq!(round_half_even(49.5), 50.0);
        assert_relative_eq!(round_half_even(50.5), 50.0);
        assert_relative_eq!(round_half_even(49.4), 49.0);
        assert_relative_eq!(round_half_even(49.6), 50.0);
    }

    #[test]
    fn equal_teeth_center_distance_is_exact() {
        // z1 == z2: L = 2m + z, so C = (L - z)/2 * p.
        let distance = center_distance_from_belt_links(120, 24, 24, 12.7).unwrap();
        assert_relative_eq!(distance, (120.0 - 24.0) / 2.0 * 12.7, epsilon = 1e-9);
    }

    #[test]
    fn too_few_links_is_infeasible() {
        // Huge tooth difference against a tiny loop.
        assert!(center_distance_from_belt_links(20, 9, 240, 12.7).is_none());
    }
}
