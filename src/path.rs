//! Belt-path tangent geometry.
//!
//! An open belt around two pulleys follows the two *external* tangent
//! lines plus the arc each line pair cuts from each circle. With
//! `d = |c2 - c1|`, `theta = atan2(c2 - c1)` and
//! `beta = acos((r2 - r1)/d)`, both tangency angles are `theta ± beta`
//! applied identically at both centers; that shared convention is what
//! makes the two tangent lines parallel external tangents. The loop is
//! traversed in a fixed order:
//!
//! ```text
//! upper tangent (c1 -> c2)
//!   -> arc on circle 2, sweep 2*pi - 2*beta
//!   -> lower tangent (c2 -> c1)
//!   -> arc on circle 1, sweep 2*beta
//! ```
//!
//! Downstream frame placement depends on exactly this ordering and these
//! sign conventions; all four tangent points and both sweeps are built in
//! this one routine.

use crate::errors::GeometryError;
use crate::float_types::{Real, TAU};
use crate::pulley::PulleyRole;
use nalgebra::Point2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed convex loop a belt takes around two circles.
///
/// Invariant: `total_length` is the sum of the four segment lengths and
/// is positive. Immutable; rebuild with [`BeltPath::between`] whenever
/// centers or radii change.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeltPath {
    pub(crate) center_1: Point2<Real>,
    pub(crate) center_2: Point2<Real>,
    pub(crate) radius_1: Real,
    pub(crate) radius_2: Real,
    /// `theta + beta`, the upper tangency angle at both centers.
    pub(crate) angle_upper: Real,
    /// `theta - beta`, the lower tangency angle at both centers.
    pub(crate) angle_lower: Real,
    pub(crate) p1_upper: Point2<Real>,
    pub(crate) p2_upper: Point2<Real>,
    pub(crate) p2_lower: Point2<Real>,
    pub(crate) p1_lower: Point2<Real>,
    pub(crate) upper_length: Real,
    pub(crate) arc2_length: Real,
    pub(crate) lower_length: Real,
    pub(crate) arc1_length: Real,
    /// Wrap sweep on circle 1: `2 * beta`.
    pub(crate) arc1_sweep: Real,
    /// Wrap sweep on circle 2: `2*pi - 2*beta`.
    pub(crate) arc2_sweep: Real,
    total_length: Real,
    center_distance: Real,
}

/// Point on a circle at a polar angle.
pub(crate) fn point_from_angle(center: Point2<Real>, radius: Real, angle: Real) -> Point2<Real> {
    Point2::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

impl BeltPath {
    /// Construct the external-tangent loop around circles
    /// `(c1, r1)` and `(c2, r2)`.
    ///
    /// # Errors
    ///
    /// [`GeometryError::CoincidentCenters`] when the centers coincide,
    /// and [`GeometryError::NoExternalTangent`] when `(r2 - r1)/d` leaves
    /// the open interval `(-1, 1)` -- the circles are too close relative
    /// to their radius difference for a real tangent line to exist.
    pub fn between(
        c1: Point2<Real>,
        c2: Point2<Real>,
        r1: Real,
        r2: Real,
    ) -> Result<Self, GeometryError> {
        let span = c2 - c1;
        let center_distance = span.norm();
        if center_distance <= 0.0 {
            return Err(GeometryError::CoincidentCenters);
        }

        let ratio = (r2 - r1) / center_distance;
        if ratio <= -1.0 || ratio >= 1.0 {
            return Err(GeometryError::NoExternalTangent { ratio });
        }

        let theta = span.y.atan2(span.x);
        let beta = ratio.acos();

        let angle_upper = theta + beta;
        let angle_lower = theta - beta;

        let p1_upper = point_from_angle(c1, r1, angle_upper);
        let p1_lower = point_from_angle(c1, r1, angle_lower);
        let p2_upper = point_from_angle(c2, r2, angle_upper);
        let p2_lower = point_from_angle(c2, r2, angle_lower);

        let upper_length = (p2_upper - p1_upper).norm();
        let lower_length = (p1_lower - p2_lower).norm();

        let arc1_sweep = 2.0 * beta;
        let arc2_sweep = TAU - arc1_sweep;

        let arc1_length = r1 * arc1_sweep;
        let arc2_length = r2 * arc2_sweep;

        Ok(Self {
            center_1: c1,
            center_2: c2,
            radius_1: r1,
            radius_2: r2,
            angle_upper,
            angle_lower,
            p1_upper,
            p2_upper,
            p2_lower,
            p1_lower,
            upper_length,
            arc2_length,
            lower_length,
            arc1_length,
            arc1_sweep,
            arc2_sweep,
            total_length: upper_length + arc2_length + lower_length + arc1_length,
            center_distance,
        })
    }

    /// Center of circle 1 (the drive side by convention).
    #[must_use]
    pub const fn center_1(&self) -> Point2<Real> {
        self.center_1
    }

    /// Center of circle 2.
    #[must_use]
    pub const fn center_2(&self) -> Point2<Real> {
        self.center_2
    }

    /// Radius of circle 1.
    #[must_use]
    pub const fn radius_1(&self) -> Real {
        self.radius_1
    }

    /// Radius of circle 2.
    #[must_use]
    pub const fn radius_2(&self) -> Real {
        self.radius_2
    }

    /// Length of the upper tangent segment (`c1` toward `c2`).
    #[must_use]
    pub const fn upper_length(&self) -> Real {
        self.upper_length
    }

    /// Length of the wrap arc on circle 2.
    #[must_use]
    pub const fn arc2_length(&self) -> Real {
        self.arc2_length
    }

    /// Length of the lower tangent segment (`c2` back toward `c1`).
    #[must_use]
    pub const fn lower_length(&self) -> Real {
        self.lower_length
    }

    /// Length of the wrap arc on circle 1.
    #[must_use]
    pub const fn arc1_length(&self) -> Real {
        self.arc1_length
    }

    /// Total loop length.
    #[must_use]
    pub const fn total_length(&self) -> Real {
        self.total_length
    }

    /// Distance between the two centers.
    #[must_use]
    pub const fn center_distance(&self) -> Real {
        self.center_distance
    }

    /// The four tangency points in traversal order:
    /// `(p1_upper, p2_upper, p2_lower, p1_lower)`.
    #[must_use]
    pub const fn tangent_points(&self) -> (Point2<Real>, Point2<Real>, Point2<Real>, Point2<Real>) {
        (self.p1_upper, self.p2_upper, self.p2_lower, self.p1_lower)
    }

    /// Belt contact sweep on the given pulley, in radians. Circle 1 is
    /// the drive side.
    #[must_use]
    pub const fn wrap_sweep(&self, role: PulleyRole) -> Real {
        match role {
            PulleyRole::Drive => self.arc1_sweep,
            PulleyRole::Driven => self.arc2_sweep,
        }
    }

    /// Belt contact angle on the given pulley, in degrees.
    #[must_use]
    pub fn wrap_degrees(&self, role: PulleyRole) -> Real {
        self.wrap_sweep(role).to_degrees()
    }
}
