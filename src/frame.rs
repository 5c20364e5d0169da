//! Arc-length parameterization and tooth-frame sampling.
//!
//! A path position is addressed by cumulative distance `s` from the start
//! of the upper tangent segment, following the traversal order fixed in
//! [`crate::path`]. Each sample yields a frame: the point, the unit
//! tangent in the direction of travel, and the unit normal pointing
//! inward toward the region between the pulley centers -- exactly what a
//! solid-modeling step needs to seat one tooth or roller.

use crate::float_types::{Real, tolerance};
use crate::path::{BeltPath, point_from_angle};
use nalgebra::{Point2, Vector2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and orientation of one sample on the belt path.
///
/// Ephemeral: produced per sample, never stored by the path itself.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathFrame {
    /// Sample position.
    pub point: Point2<Real>,
    /// Unit direction of travel along the loop.
    pub tangent: Vector2<Real>,
    /// Unit normal pointing from the path toward the pulley centers.
    pub inward: Vector2<Real>,
}

/// Normalize, or return zero when the vector is degenerate.
fn normalize_or_zero(v: Vector2<Real>) -> Vector2<Real> {
    let magnitude = v.norm();
    if magnitude <= tolerance() {
        Vector2::zeros()
    } else {
        v / magnitude
    }
}

/// Inward normal on a straight run: the normalized sum of the unit
/// vectors toward each center. Falls back to the 90-degree-rotated
/// tangent when the sum cancels (sample equidistant between centers in a
/// degenerate configuration).
fn straight_inward(
    point: Point2<Real>,
    tangent: Vector2<Real>,
    c1: Point2<Real>,
    c2: Point2<Real>,
) -> Vector2<Real> {
    let toward_1 = normalize_or_zero(c1 - point);
    let toward_2 = normalize_or_zero(c2 - point);
    let inward = normalize_or_zero(toward_1 + toward_2);
    if inward == Vector2::zeros() {
        normalize_or_zero(Vector2::new(-tangent.y, tangent.x))
    } else {
        inward
    }
}

impl BeltPath {
    /// Frame at path-length coordinate `s`, expected in
    /// `[0, total_length)`.
    ///
    /// Segment boundaries are half-open: a coordinate landing exactly on
    /// a boundary belongs to the *following* segment, so no boundary is
    /// double-counted and none is skipped. Zero-length segments collapse
    /// to their start point.
    #[must_use]
    pub fn frame_at(&self, s: Real) -> PathFrame {
        let segment_1_end = self.upper_length;
        let segment_2_end = segment_1_end + self.arc2_length;
        let segment_3_end = segment_2_end + self.lower_length;

        let (point, tangent, inward) = if s < segment_1_end {
            let point = if self.upper_length <= tolerance() {
                self.p1_upper
            } else {
                let t = s / self.upper_length;
                self.p1_upper + (self.p2_upper - self.p1_upper) * t
            };
            let tangent = normalize_or_zero(self.p2_upper - self.p1_upper);
            let inward = straight_inward(point, tangent, self.center_1, self.center_2);
            (point, tangent, inward)
        } else if s < segment_2_end {
            let angle = self.angle_upper + (s - segment_1_end) / self.radius_2;
            let point = point_from_angle(self.center_2, self.radius_2, angle);
            let tangent = Vector2::new(-angle.sin(), angle.cos());
            let inward = normalize_or_zero(self.center_2 - point);
            (point, tangent, inward)
        } else if s < segment_3_end {
            let line_s = s - segment_2_end;
            let point = if self.lower_length <= tolerance() {
                self.p2_lower
            } else {
                let t = line_s / self.lower_length;
                self.p2_lower + (self.p1_lower - self.p2_lower) * t
            };
            let tangent = normalize_or_zero(self.p1_lower - self.p2_lower);
            let inward = straight_inward(point, tangent, self.center_1, self.center_2);
            (point, tangent, inward)
        } else {
            let angle = self.angle_lower + (s - segment_3_end) / self.radius_1;
            let point = point_from_angle(self.center_1, self.radius_1, angle);
            let tangent = Vector2::new(-angle.sin(), angle.cos());
            let inward = normalize_or_zero(self.center_1 - point);
            (point, tangent, inward)
        };

        PathFrame {
            point,
            tangent,
            inward,
        }
    }

    /// `count` evenly spaced frames at `s = i * total_length / count` for
    /// `i = 0..count`.
    ///
    /// Every sample is an independent pure computation; with the
    /// `parallel` feature the samples are evaluated concurrently, and the
    /// returned vector is ordered by `i` either way.
    #[must_use]
    pub fn sample_frames(&self, count: usize) -> Vec<PathFrame> {
        if count == 0 {
            return Vec::new();
        }
        let step = self.total_length() / count as Real;

        #[cfg(feature = "parallel")]
        {
            (0..count)
                .into_par_iter()
                .map(|i| self.frame_at(i as Real * step))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..count).map(|i| self.frame_at(i as Real * step)).collect()
        }
    }
}
