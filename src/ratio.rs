//! Tooth-count ratio solver.
//!
//! Exhaustively enumerates `(drive, driven)` tooth pairs over an
//! inclusive range, rejects pairs whose tip diameter exceeds the ceiling,
//! and keeps the pair minimizing the lexicographic key
//! `(ratio_error, -min(pair), -max(pair))`: ratio accuracy first, then
//! larger tooth counts for smoother running. The key is completed into a
//! total order by ascending `(drive, driven)`, so identical inputs always
//! select the identical pair, with or without the `parallel` feature.

use crate::float_types::Real;
use crate::pulley::{BeltGeometry, PulleySpec};
use core::cmp::Ordering;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Search constraints for automatic tooth-count selection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RatioSearch {
    /// Desired `driven / drive` speed ratio, must be positive.
    pub target_ratio: Real,
    /// Inclusive lower tooth bound for both pulleys.
    pub min_teeth: u32,
    /// Inclusive upper tooth bound for both pulleys.
    pub max_teeth: u32,
    /// Ceiling on either pulley's tip diameter.
    pub max_pulley_diameter: Real,
}

impl Default for RatioSearch {
    fn default() -> Self {
        Self {
            target_ratio: 6.5,
            min_teeth: 12,
            max_teeth: 80,
            max_pulley_diameter: 120.0,
        }
    }
}

/// The selected tooth-count pair and its derived figures.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RatioSolution {
    /// Teeth on the driving pulley.
    pub drive_teeth: u32,
    /// Teeth on the driven pulley.
    pub driven_teeth: u32,
    /// `driven_teeth / drive_teeth`.
    pub actual_ratio: Real,
    /// Relative error against the target ratio.
    pub ratio_error: Real,
    /// Tip diameter of the drive pulley.
    pub drive_diameter: Real,
    /// Tip diameter of the driven pulley.
    pub driven_diameter: Real,
}

/// Total order over candidates: ratio error ascending, then the larger
/// minimum tooth count, then the larger maximum, then ascending
/// `(drive, driven)` as the final deterministic tie-break.
fn candidate_order(a: &RatioSolution, b: &RatioSolution) -> Ordering {
    a.ratio_error
        .partial_cmp(&b.ratio_error)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            let a_min = a.drive_teeth.min(a.driven_teeth);
            let b_min = b.drive_teeth.min(b.driven_teeth);
            b_min.cmp(&a_min)
        })
        .then_with(|| {
            let a_max = a.drive_teeth.max(a.driven_teeth);
            let b_max = b.drive_teeth.max(b.driven_teeth);
            b_max.cmp(&a_max)
        })
        .then_with(|| {
            (a.drive_teeth, a.driven_teeth).cmp(&(b.drive_teeth, b.driven_teeth))
        })
}

/// Evaluate one pair, or `None` when it violates the diameter ceiling
/// (or the radius model has no answer for it).
fn evaluate_pair(
    drive_teeth: u32,
    driven_teeth: u32,
    search: &RatioSearch,
    belt: &BeltGeometry,
) -> Option<RatioSolution> {
    let drive = PulleySpec::from_belt_geometry(drive_teeth, belt).ok()?;
    let driven = PulleySpec::from_belt_geometry(driven_teeth, belt).ok()?;

    if drive.tip_diameter() > search.max_pulley_diameter
        || driven.tip_diameter() > search.max_pulley_diameter
    {
        return None;
    }

    let actual_ratio = driven_teeth as Real / drive_teeth as Real;
    Some(RatioSolution {
        drive_teeth,
        driven_teeth,
        actual_ratio,
        ratio_error: (actual_ratio - search.target_ratio).abs() / search.target_ratio,
        drive_diameter: drive.tip_diameter(),
        driven_diameter: driven.tip_diameter(),
    })
}

/// Find the tooth-count pair best matching `search.target_ratio`.
///
/// `None` means no pair in the range satisfies the diameter ceiling; the
/// caller should relax the constraints rather than treat it as a fault.
/// `O((max_teeth - min_teeth + 1)^2)` candidate evaluations, each pure
/// and independent.
#[must_use]
pub fn solve_tooth_counts(search: &RatioSearch, belt: &BeltGeometry) -> Option<RatioSolution> {
    if search.max_teeth < search.min_teeth {
        return None;
    }

    let best = best_candidate(search, belt);

    if let Some(solution) = &best {
        debug!(
            drive_teeth = solution.drive_teeth,
            driven_teeth = solution.driven_teeth,
            actual_ratio = solution.actual_ratio,
            ratio_error = solution.ratio_error,
            "ratio solver selected tooth pair"
        );
    } else {
        debug!(
            target_ratio = search.target_ratio,
            min_teeth = search.min_teeth,
            max_teeth = search.max_teeth,
            "ratio solver found no feasible pair"
        );
    }

    best
}

#[cfg(not(feature = "parallel"))]
fn best_candidate(search: &RatioSearch, belt: &BeltGeometry) -> Option<RatioSolution> {
    let mut best: Option<RatioSolution> = None;

    for drive_teeth in search.min_teeth..=search.max_teeth {
        for driven_teeth in search.min_teeth..=search.max_teeth {
            let Some(candidate) = evaluate_pair(drive_teeth, driven_teeth, search, belt) else {
                continue;
            };
            best = match best {
                Some(current) if candidate_order(&candidate, &current) == Ordering::Less => {
                    Some(candidate)
                }
                Some(current) => Some(current),
                None => Some(candidate),
            };
        }
    }

    best
}

#[cfg(feature = "parallel")]
fn best_candidate(search: &RatioSearch, belt: &BeltGeometry) -> Option<RatioSolution> {
    // The order is total, so the parallel reduction agrees with the
    // sequential scan.
    (search.min_teeth..=search.max_teeth)
        .into_par_iter()
        .flat_map_iter(|drive_teeth| {
            (search.min_teeth..=search.max_teeth)
                .filter_map(move |driven_teeth| {
                    evaluate_pair(drive_teeth, driven_teeth, search, belt)
                })
        })
        .min_by(candidate_order)
}
