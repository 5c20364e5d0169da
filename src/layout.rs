//! Layout pipeline.
//!
//! [`plan_drive`] runs the whole chain on a validated configuration:
//! tooth selection, radius model, center distance, wrap path, element
//! count, tooth frames, diagnostics. Pure data in, pure data out; the
//! result is everything a solid-construction step downstream consumes.

use crate::config::{CenterDistanceSource, DriveConfig, ToothSelection};
use crate::diagnostics::{
    EngineeringWarning, center_distance_warnings, even_adjustment_note, phase_indexing_note,
    wrap_angle_warnings,
};
use crate::errors::{BeltError, BeltResult, GeometryError};
use crate::float_types::Real;
use crate::frame::PathFrame;
use crate::links::{LinkCount, center_distance_from_belt_links, determine_link_count};
use crate::path::BeltPath;
use crate::pulley::{PulleyRole, PulleySpec};
use crate::ratio::{RatioSolution, solve_tooth_counts};
use crate::validate::validate_drive_config;
use nalgebra::Point2;
use tracing::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest share of the hub diameter a bore may consume.
const MAX_BORE_HUB_SHARE: Real = 0.95;

/// How the planned center distance was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CenterSource {
    /// Solved from the belt-length approximation.
    BeltLinks,
    /// Taken from the configuration verbatim.
    Manual,
}

impl CenterSource {
    /// Human-readable provenance, as reported in summaries.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            CenterSource::BeltLinks => "auto from belt links approximation",
            CenterSource::Manual => "manual center distance input",
        }
    }
}

/// Complete planned layout for one two-pulley transmission.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveLayout {
    /// The configuration this layout was planned from.
    pub config: DriveConfig,
    /// Drive pulley radii.
    pub drive: PulleySpec,
    /// Driven pulley radii.
    pub driven: PulleySpec,
    /// Present when the tooth counts came from the ratio solver.
    pub ratio_solution: Option<RatioSolution>,
    /// Planned center distance.
    pub center_distance: Real,
    /// Where the center distance came from.
    pub center_source: CenterSource,
    /// The belt wrap path at pitch radius.
    pub path: BeltPath,
    /// Belt element count decision.
    pub link_count: LinkCount,
    /// `total_length / link_count.adjusted`, the pitch the belt will
    /// actually run at.
    pub effective_pitch: Real,
    /// One frame per belt element, evenly spaced along the loop.
    pub frames: Vec<PathFrame>,
    /// Advisory findings, in insertion order.
    pub warnings: Vec<EngineeringWarning>,
}

impl DriveLayout {
    /// `driven_teeth / drive_teeth`.
    #[must_use]
    pub fn actual_ratio(&self) -> Real {
        self.driven.tooth_count() as Real / self.drive.tooth_count() as Real
    }

    /// Driven shaft speed as a fraction of drive speed.
    #[must_use]
    pub fn speed_factor(&self) -> Real {
        self.drive.tooth_count() as Real / self.driven.tooth_count() as Real
    }

    /// Center distance expressed in belt pitches.
    #[must_use]
    pub fn center_in_pitches(&self) -> Real {
        self.center_distance / self.config.belt.belt_pitch
    }

    /// Relative deviation of the effective pitch from the requested one,
    /// in percent.
    #[must_use]
    pub fn pitch_deviation_pct(&self) -> Real {
        (self.effective_pitch - self.config.belt.belt_pitch).abs() / self.config.belt.belt_pitch
            * 100.0
    }
}

fn check_bore(spec: &PulleySpec, bore_diameter: Real, role: PulleyRole) -> BeltResult<()> {
    if bore_diameter > 2.0 * spec.root_radius() * MAX_BORE_HUB_SHARE {
        return Err(GeometryError::BoreExceedsHub { role }.into());
    }
    Ok(())
}

/// Plan the full layout for `config`.
///
/// Stage order is fixed: validation (all issues collected) runs before
/// anything else; the ratio solver's empty outcome maps to
/// [`BeltError::NoFeasiblePair`]; geometric interactions (bore vs. hub,
/// infeasible link count, pulley overlap, tangent construction) surface
/// as [`BeltError::Geometry`].
///
/// # Errors
///
/// See [`BeltError`]; degenerate numeric cases inside the path are
/// handled internally and never surface.
pub fn plan_drive(config: &DriveConfig) -> BeltResult<DriveLayout> {
    let issues = validate_drive_config(config);
    if !issues.is_empty() {
        return Err(BeltError::Validation(issues));
    }

    let (drive_teeth, driven_teeth, ratio_solution) = match config.tooth_selection {
        ToothSelection::Manual {
            drive_teeth,
            driven_teeth,
        } => (drive_teeth, driven_teeth, None),
        ToothSelection::FromRatio(search) => {
            let solution =
                solve_tooth_counts(&search, &config.belt).ok_or(BeltError::NoFeasiblePair)?;
            (solution.drive_teeth, solution.driven_teeth, Some(solution))
        },
    };

    let drive = PulleySpec::from_belt_geometry(drive_teeth, &config.belt)?;
    let driven = PulleySpec::from_belt_geometry(driven_teeth, &config.belt)?;

    check_bore(&drive, config.drive_bore_diameter, PulleyRole::Drive)?;
    check_bore(&driven, config.driven_bore_diameter, PulleyRole::Driven)?;

    let (center_distance, center_source) = match config.center_distance {
        CenterDistanceSource::FromBeltLinks(links) => {
            let distance = center_distance_from_belt_links(
                links,
                drive_teeth,
                driven_teeth,
                config.belt.belt_pitch,
            )
            .ok_or(GeometryError::BeltLinksInfeasible { links })?;
            (distance, CenterSource::BeltLinks)
        },
        CenterDistanceSource::Manual(distance) => (distance, CenterSource::Manual),
    };

    let minimum_distance = drive.tip_radius() + driven.tip_radius();
    if center_distance <= minimum_distance {
        return Err(GeometryError::PulleyOverlap {
            center_distance,
            minimum_distance,
        }
        .into());
    }

    // Drive pulley at the origin, driven along +x; callers transform the
    // result into their own frame.
    let path = BeltPath::between(
        Point2::new(0.0, 0.0),
        Point2::new(center_distance, 0.0),
        drive.pitch_radius(),
        driven.pitch_radius(),
    )?;

    let link_count = determine_link_count(
        path.total_length(),
        config.belt.belt_pitch,
        config.link_count,
        config.enforce_even_links,
    );
    let effective_pitch = path.total_length() / link_count.adjusted as Real;
    let frames = path.sample_frames(link_count.adjusted as usize);

    let mut warnings = center_distance_warnings(center_distance, config.belt.belt_pitch);
    warnings.extend(wrap_angle_warnings(&path));
    warnings.extend(even_adjustment_note(&link_count));
    warnings.extend(phase_indexing_note(&link_count, drive_teeth, driven_teeth));

    info!(
        drive_teeth,
        driven_teeth,
        center_distance,
        total_length = path.total_length(),
        belt_teeth = link_count.adjusted,
        warning_count = warnings.len(),
        "planned belt drive layout"
    );

    Ok(DriveLayout {
        config: *config,
        drive,
        driven,
        ratio_solution,
        center_distance,
        center_source,
        path,
        link_count,
        effective_pitch,
        frames,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationIssue;
    use crate::ratio::RatioSearch;
    use approx::assert_relative_eq;

    #[test]
    fn default_config_plans_cleanly() {
        let layout = plan_drive(&DriveConfig::default()).unwrap();
        assert_eq!(layout.drive.tooth_count(), 24);
        assert_eq!(layout.driven.tooth_count(), 48);
        assert_relative_eq!(layout.actual_ratio(), 2.0);
        assert_eq!(layout.center_source, CenterSource::BeltLinks);
        assert_eq!(layout.frames.len(), layout.link_count.adjusted as usize);
        assert!(layout.effective_pitch > 0.0);
    }

    #[test]
    fn validation_failures_stop_before_geometry() {
        let config = DriveConfig::default().with_manual_center_distance(-1.0);
        match plan_drive(&config) {
            Err(BeltError::Validation(issues)) => {
                assert_eq!(issues, vec![ValidationIssue::NonPositiveCenterDistance]);
            },
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn ratio_mode_fills_in_solver_result() {
        let config = DriveConfig::default()
            .with_ratio_search(RatioSearch {
                target_ratio: 2.0,
                min_teeth: 9,
                max_teeth: 40,
                max_pulley_diameter: 1.0e6,
            })
            .with_manual_center_distance(400.0);
        let layout = plan_drive(&config).unwrap();
        assert_eq!(layout.drive.tooth_count(), 20);
        assert_eq!(layout.driven.tooth_count(), 40);
        let solution = layout.ratio_solution.unwrap();
        assert_relative_eq!(solution.ratio_error, 0.0);
    }

    #[test]
    fn impossible_ratio_search_is_no_feasible_pair() {
        let config = DriveConfig::default().with_ratio_search(RatioSearch {
            target_ratio: 2.0,
            min_teeth: 9,
            max_teeth: 40,
            max_pulley_diameter: 1.0,
        });
        assert!(matches!(plan_drive(&config), Err(BeltError::NoFeasiblePair)));
    }

    #[test]
    fn close_centers_overlap() {
        let config = DriveConfig::default().with_manual_center_distance(10.0);
        assert!(matches!(
            plan_drive(&config),
            Err(BeltError::Geometry(GeometryError::PulleyOverlap { .. }))
        ));
    }

    #[test]
    fn oversized_bore_is_rejected() {
        let config = DriveConfig::default().with_bore_diameters(500.0, 8.0);
        assert!(matches!(
            plan_drive(&config),
            Err(BeltError::Geometry(GeometryError::BoreExceedsHub {
                role: PulleyRole::Drive
            }))
        ));
    }

    #[test]
    fn short_center_distance_carries_warning() {
        // 20 pitches = 254; pulleys fit (tip radii ~54 + 103).
        let config = DriveConfig::default().with_manual_center_distance(20.0 * 12.7);
        let layout = plan_drive(&config).unwrap();
        assert!(layout.warnings.iter().any(|w| matches!(
            w,
            EngineeringWarning::CenterDistanceOutsideRecommended { .. }
        )));
    }

    #[test]
    fn effective_pitch_tracks_loop_length() {
        let layout = plan_drive(&DriveConfig::default()).unwrap();
        assert_relative_eq!(
            layout.effective_pitch * layout.link_count.adjusted as Real,
            layout.path.total_length(),
            epsilon = 1e-9
        );
        // Auto mode keeps the deviation small.
        assert!(layout.pitch_deviation_pct() < 2.0);
    }
}
