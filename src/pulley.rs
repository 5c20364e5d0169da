//! Pulley radius model.
//!
//! A timing pulley seats the belt's pitch line on a circle whose radius
//! follows from the chord relationship `pitch = 2 r sin(pi/n)`: `n` teeth
//! spaced one belt pitch apart around the pitch circle. Root and tip
//! radii bracket the pitch circle by a fixed share of the tooth height,
//! plus tip clearance on the outside.

use crate::errors::GeometryError;
use crate::float_types::{PI, Real};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of the transmission a pulley sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PulleyRole {
    /// The driving (input) pulley.
    Drive,
    /// The driven (output) pulley.
    Driven,
}

/// Belt profile dimensions shared by both pulleys of a drive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeltGeometry {
    /// Distance between adjacent teeth along the pitch line.
    pub belt_pitch: Real,
    /// Radial height of the tooth (or roller) profile.
    pub tooth_height: Real,
    /// Extra radial gap above the tooth tips.
    pub tip_clearance: Real,
}

impl Default for BeltGeometry {
    fn default() -> Self {
        // 1/2" pitch with a 7.9 mm tooth profile.
        Self {
            belt_pitch: 12.7,
            tooth_height: 7.9,
            tip_clearance: 1.5,
        }
    }
}

/// Share of the tooth height on each side of the pitch circle.
const TOOTH_HEIGHT_SPLIT: Real = 0.55;

/// Pitch, root, and tip radii of one pulley.
///
/// Invariant: `0 < root_radius < pitch_radius < tip_radius`. Immutable
/// once computed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulleySpec {
    tooth_count: u32,
    pitch_radius: Real,
    root_radius: Real,
    tip_radius: Real,
}

impl PulleySpec {
    /// Derive the radii for a pulley with `tooth_count` teeth seating the
    /// given belt.
    ///
    /// # Errors
    ///
    /// [`GeometryError::ToothCountDomain`] below two teeth (the chord
    /// formula divides by `sin(pi/n)`), and
    /// [`GeometryError::InvalidRootRadius`] when the tooth height eats
    /// through the pulley body.
    pub fn from_belt_geometry(
        tooth_count: u32,
        belt: &BeltGeometry,
    ) -> Result<Self, GeometryError> {
        if tooth_count < 2 {
            return Err(GeometryError::ToothCountDomain { tooth_count });
        }

        let pitch_radius = belt.belt_pitch / (2.0 * (PI / tooth_count as Real).sin());
        let root_radius = pitch_radius - TOOTH_HEIGHT_SPLIT * belt.tooth_height;
        let tip_radius = pitch_radius + TOOTH_HEIGHT_SPLIT * belt.tooth_height + belt.tip_clearance;

        if root_radius <= 0.0 {
            return Err(GeometryError::InvalidRootRadius { tooth_count });
        }

        Ok(Self {
            tooth_count,
            pitch_radius,
            root_radius,
            tip_radius,
        })
    }

    /// Number of teeth.
    #[must_use]
    pub const fn tooth_count(&self) -> u32 {
        self.tooth_count
    }

    /// Radius of the circle the belt pitch line wraps.
    #[must_use]
    pub const fn pitch_radius(&self) -> Real {
        self.pitch_radius
    }

    /// Inner bound of the tooth profile.
    #[must_use]
    pub const fn root_radius(&self) -> Real {
        self.root_radius
    }

    /// Outer bound of the tooth profile, tip clearance included.
    #[must_use]
    pub const fn tip_radius(&self) -> Real {
        self.tip_radius
    }

    /// Pitch circle diameter.
    #[must_use]
    pub fn pitch_diameter(&self) -> Real {
        2.0 * self.pitch_radius
    }

    /// Outside diameter, the envelope a diameter ceiling is checked
    /// against.
    #[must_use]
    pub fn tip_diameter(&self) -> Real {
        2.0 * self.tip_radius
    }
}
