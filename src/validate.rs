//! Input validation.
//!
//! Runs before any geometry and collects *every* issue instead of
//! stopping at the first, so a caller can present the complete list at
//! once. A clean result here is what the path solver and everything
//! downstream assume.

use crate::config::{CenterDistanceSource, DriveConfig, ToothSelection};
use crate::errors::ValidationIssue;
use crate::links::{LinkCountSource, MIN_LINK_COUNT};
use crate::ratio::RatioSearch;

/// Fewest teeth a pulley can carry and still run a belt smoothly.
pub const MIN_SPROCKET_TEETH: u32 = 9;

/// Check the ratio-search constraints on their own.
#[must_use]
pub fn validate_ratio_search(search: &RatioSearch) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if search.target_ratio <= 0.0 {
        issues.push(ValidationIssue::NonPositiveTargetRatio);
    }
    if search.max_pulley_diameter <= 0.0 {
        issues.push(ValidationIssue::NonPositiveDiameterCeiling);
    }
    if search.min_teeth < MIN_SPROCKET_TEETH {
        issues.push(ValidationIssue::MinToothLimitTooSmall {
            minimum: MIN_SPROCKET_TEETH,
        });
    }
    if search.max_teeth < search.min_teeth {
        issues.push(ValidationIssue::ToothRangeInverted);
    }

    issues
}

/// Check every configuration field, collecting all issues.
#[must_use]
pub fn validate_drive_config(config: &DriveConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match config.tooth_selection {
        ToothSelection::Manual {
            drive_teeth,
            driven_teeth,
        } => {
            if drive_teeth < MIN_SPROCKET_TEETH || driven_teeth < MIN_SPROCKET_TEETH {
                issues.push(ValidationIssue::ToothCountTooSmall {
                    minimum: MIN_SPROCKET_TEETH,
                });
            }
        },
        ToothSelection::FromRatio(search) => {
            issues.extend(validate_ratio_search(&search));
        },
    }

    if config.belt.belt_pitch <= 0.0 {
        issues.push(ValidationIssue::NonPositiveBeltPitch);
    }
    if config.belt.tooth_height <= 0.0 {
        issues.push(ValidationIssue::NonPositiveToothHeight);
    }
    if config.pulley_thickness <= 0.0 {
        issues.push(ValidationIssue::NonPositiveThickness);
    }
    if config.belt_width <= 0.0 {
        issues.push(ValidationIssue::NonPositiveBeltWidth);
    }
    if config.belt.belt_pitch > 0.0 && config.belt.tooth_height >= config.belt.belt_pitch {
        issues.push(ValidationIssue::ToothHeightNotBelowPitch);
    }
    if config.belt.tip_clearance < 0.0 {
        issues.push(ValidationIssue::NegativeTipClearance);
    }
    if config.drive_bore_diameter < 0.0 || config.driven_bore_diameter < 0.0 {
        issues.push(ValidationIssue::NegativeBoreDiameter);
    }

    match config.center_distance {
        CenterDistanceSource::FromBeltLinks(links) => {
            if links < MIN_LINK_COUNT {
                issues.push(ValidationIssue::BeltLinksTooFew {
                    minimum: MIN_LINK_COUNT,
                });
            }
        },
        CenterDistanceSource::Manual(distance) => {
            if distance <= 0.0 {
                issues.push(ValidationIssue::NonPositiveCenterDistance);
            }
        },
    }

    if let LinkCountSource::Manual(count) = config.link_count
        && count < MIN_LINK_COUNT
    {
        issues.push(ValidationIssue::ManualLinkCountTooSmall {
            minimum: MIN_LINK_COUNT,
        });
    }

    issues
}
