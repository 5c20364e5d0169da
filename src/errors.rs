//! Error taxonomy: collected input-validation issues, geometric
//! infeasibility, and the umbrella [`BeltError`].
//!
//! Validation problems are gathered all at once and reported together so a
//! caller can surface every bad field in a single pass. Geometric
//! infeasibility is kept distinct because it arises from the *interaction*
//! of otherwise-valid inputs. A ratio search that finds nothing is a
//! "no solution" outcome, not a fault.

use crate::float_types::Real;
use crate::pulley::PulleyRole;
use std::fmt::Display;
use std::path::PathBuf;

/// A single malformed or out-of-range configuration value.
///
/// These are collected, never returned one at a time; see
/// [`crate::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
    /// A pulley tooth count is below the stable minimum.
    #[error("Both tooth counts must be at least {minimum}.")]
    ToothCountTooSmall {
        /// Smallest allowed tooth count.
        minimum: u32,
    },
    /// Belt pitch must be a positive length.
    #[error("Belt pitch must be positive.")]
    NonPositiveBeltPitch,
    /// Tooth (or roller) height must be a positive length.
    #[error("Tooth height must be positive.")]
    NonPositiveToothHeight,
    /// Pulley thickness must be a positive length.
    #[error("Pulley thickness must be positive.")]
    NonPositiveThickness,
    /// Belt width must be a positive length.
    #[error("Belt width must be positive.")]
    NonPositiveBeltWidth,
    /// The tooth profile cannot be taller than one pitch.
    #[error("Tooth height must be smaller than belt pitch.")]
    ToothHeightNotBelowPitch,
    /// Tip clearance may be zero but never negative.
    #[error("Tip clearance cannot be negative.")]
    NegativeTipClearance,
    /// Bore diameters may be zero (solid hub) but never negative.
    #[error("Bore diameters cannot be negative.")]
    NegativeBoreDiameter,
    /// Belt links used for center-distance derivation are too few.
    #[error("Belt links must be at least {minimum}.")]
    BeltLinksTooFew {
        /// Smallest workable link count.
        minimum: u32,
    },
    /// Manual center distance must be positive when selected.
    #[error("Manual center distance must be positive.")]
    NonPositiveCenterDistance,
    /// Manually requested belt tooth count is below the stable minimum.
    #[error("Manual belt tooth count must be at least {minimum}.")]
    ManualLinkCountTooSmall {
        /// Smallest workable link count.
        minimum: u32,
    },
    /// Ratio-search target must be positive.
    #[error("Target ratio must be positive.")]
    NonPositiveTargetRatio,
    /// Ratio-search diameter ceiling must be positive.
    #[error("Max pulley diameter must be positive.")]
    NonPositiveDiameterCeiling,
    /// Ratio-search lower tooth bound is below the stable minimum.
    #[error("Minimum tooth limit must be at least {minimum}.")]
    MinToothLimitTooSmall {
        /// Smallest allowed tooth count.
        minimum: u32,
    },
    /// Ratio-search bounds are inverted.
    #[error("Maximum tooth limit must be greater than or equal to the minimum tooth limit.")]
    ToothRangeInverted,
}

/// Tangent construction or pulley placement that cannot work for the
/// given (individually valid) inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The two pulley centers coincide; no direction exists for the span.
    #[error("pulley centers are coincident; center distance must be positive")]
    CoincidentCenters,
    /// `(r2 - r1) / d` left the open interval `(-1, 1)`: one circle would
    /// have to contain the other, so no external tangent line exists.
    #[error("no external tangent: (r2 - r1)/d = {ratio} is outside (-1, 1)")]
    NoExternalTangent {
        /// The offending radius-difference ratio.
        ratio: Real,
    },
    /// Centers are so close the pulleys overlap.
    #[error(
        "center distance {center_distance} causes pulley overlap; must exceed {minimum_distance}"
    )]
    PulleyOverlap {
        /// Measured center distance.
        center_distance: Real,
        /// Sum of the relevant radii.
        minimum_distance: Real,
    },
    /// `pitch/(2 sin(pi/n))` is undefined below two teeth.
    #[error("tooth count {tooth_count} is below the domain minimum of 2")]
    ToothCountDomain {
        /// The offending tooth count.
        tooth_count: u32,
    },
    /// The tooth profile consumed the whole pulley body.
    #[error("root radius is not positive for {tooth_count} teeth; increase pitch or reduce tooth height")]
    InvalidRootRadius {
        /// Tooth count whose root radius collapsed.
        tooth_count: u32,
    },
    /// Requested bore does not leave enough hub material.
    #[error("{role} bore diameter is too large for the pulley root/hub geometry")]
    BoreExceedsHub {
        /// Which pulley the bore belongs to.
        role: PulleyRole,
    },
    /// The belt-length quadratic has no positive center-distance root.
    #[error("belt link count {links} is not feasible for this tooth pair; increase links or reduce tooth difference")]
    BeltLinksInfeasible {
        /// The requested link count.
        links: u32,
    },
}

/// Top-level error type for layout planning and export.
#[derive(Debug, thiserror::Error)]
pub enum BeltError {
    /// One or more configuration values failed validation. Every issue is
    /// present; nothing downstream of validation has run.
    #[error("input validation failed:{}", format_issues(.0))]
    Validation(Vec<ValidationIssue>),
    /// The ratio solver exhausted its search range without a pair that
    /// satisfies the diameter ceiling. Relax constraints and retry.
    #[error("no tooth-count pair satisfies the ratio/diameter/range constraints")]
    NoFeasiblePair,
    /// Tangent construction or pulley placement is impossible.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Writing the summary table failed.
    #[error("failed to write to {}: {source}", .path.display())]
    IoWrite {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for layout operations.
pub type BeltResult<T> = std::result::Result<T, BeltError>;

/// One issue per line, `- ` bulleted, matching the collected-report style
/// callers present to users.
fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("\n- {issue}"))
        .collect()
}

impl Display for PulleyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PulleyRole::Drive => write!(f, "drive"),
            PulleyRole::Driven => write!(f, "driven"),
        }
    }
}
