// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rectangular footprints of furniture and fixtures.
//!
//! A [`Footprint`] is an immutable value: translating or rotating it returns a
//! new footprint, so the placement search can rotate a candidate and undo the
//! rotation by plain composition.

use nalgebra::{Point2, Rotation2, Vector2};
use std::f64::consts::PI;

use crate::types::BoundingBox;

/// Separation below which two footprints are considered touching, not overlapping.
pub const OVERLAP_EPSILON: f64 = 1e-9;

/// Four corners of an axis-aligned-then-rotated rectangle plus the rotation
/// accumulated so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    corners: [Point2<f64>; 4],
    rotation_deg: f64,
}

impl Footprint {
    /// Build an unrotated footprint from the planar part of a bounding box.
    ///
    /// Corners run `(min,min) -> (max,min) -> (max,max) -> (min,max)`, so the
    /// first edge spans the local width and the second the local depth.
    pub fn from_box(bbox: &BoundingBox) -> Self {
        let (min, max) = (bbox.min, bbox.max);
        Self {
            corners: [
                Point2::new(min[0], min[1]),
                Point2::new(max[0], min[1]),
                Point2::new(max[0], max[1]),
                Point2::new(min[0], max[1]),
            ],
            rotation_deg: 0.0,
        }
    }

    pub fn corners(&self) -> &[Point2<f64>; 4] {
        &self.corners
    }

    /// Cumulative rotation in degrees, never wrapped.
    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn aabb(&self) -> (Point2<f64>, Point2<f64>) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for c in &self.corners {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        (min, max)
    }

    /// Center of the bounding rectangle.
    pub fn center(&self) -> Point2<f64> {
        let (min, max) = self.aabb();
        nalgebra::center(&min, &max)
    }

    /// Width and height of the axis-aligned bounds.
    pub fn extents(&self) -> Vector2<f64> {
        let (min, max) = self.aabb();
        max - min
    }

    /// Largest planar dimension of the axis-aligned bounds.
    pub fn largest_extent(&self) -> f64 {
        let e = self.extents();
        e.x.max(e.y)
    }

    /// Width and depth in the footprint's own frame, unaffected by rotation.
    pub fn local_extents(&self) -> Vector2<f64> {
        Vector2::new(
            (self.corners[1] - self.corners[0]).norm(),
            (self.corners[2] - self.corners[1]).norm(),
        )
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let offset = Vector2::new(dx, dy);
        Self {
            corners: self.corners.map(|c| c + offset),
            rotation_deg: self.rotation_deg,
        }
    }

    /// Move the footprint so its center lands on `target`.
    pub fn centered_at(&self, target: &Point2<f64>) -> Self {
        let delta = target - self.center();
        self.translated(delta.x, delta.y)
    }

    /// Rotate about the footprint's own center by `theta_deg` (counter-clockwise).
    ///
    /// The angle is applied as `floor(theta / 180)` half-turns followed by the
    /// residual in `[0, 180)`.
    pub fn rotated(&self, theta_deg: f64) -> Self {
        let center = self.center();
        let half_turns = (theta_deg / 180.0).floor();
        let residual = Rotation2::new((theta_deg - half_turns * 180.0).to_radians());
        let half_turn = Rotation2::new(PI);
        let count = half_turns.abs() as u64;

        let corners = self.corners.map(|c| {
            let mut v = c - center;
            for _ in 0..count {
                v = half_turn * v;
            }
            center + residual * v
        });

        Self {
            corners,
            rotation_deg: self.rotation_deg + theta_deg,
        }
    }

    /// Rotate about the center by `theta_deg` in a single step.
    pub fn rotated_once(&self, theta_deg: f64) -> Self {
        let center = self.center();
        let rotation = Rotation2::new(theta_deg.to_radians());
        Self {
            corners: self.corners.map(|c| center + rotation * (c - center)),
            rotation_deg: self.rotation_deg + theta_deg,
        }
    }

    /// True if the interiors of the two rectangles overlap.
    ///
    /// Separating-axis test over both rectangles' edge normals; shared edges
    /// and corners do not count as overlap.
    pub fn overlaps(&self, other: &Footprint) -> bool {
        for quad in [&self.corners, &other.corners] {
            // Opposite edges are parallel, two normals per rectangle suffice.
            for i in 0..2 {
                let edge = quad[i + 1] - quad[i];
                let Some(axis) = Vector2::new(-edge.y, edge.x).try_normalize(f64::EPSILON) else {
                    continue;
                };
                let (min_a, max_a) = project(&self.corners, &axis);
                let (min_b, max_b) = project(&other.corners, &axis);
                if max_a <= min_b + OVERLAP_EPSILON || max_b <= min_a + OVERLAP_EPSILON {
                    return false;
                }
            }
        }
        true
    }

    /// True if `point` lies strictly inside the rectangle.
    pub fn contains_point_strict(&self, point: &Point2<f64>) -> bool {
        let orientation = signed_area(&self.corners).signum();
        if orientation == 0.0 {
            return false;
        }
        (0..4).all(|i| {
            let a = self.corners[i];
            let b = self.corners[(i + 1) % 4];
            let edge = b - a;
            let len = edge.norm();
            len > 0.0 && orientation * edge.perp(&(point - a)) / len > OVERLAP_EPSILON
        })
    }
}

fn project(corners: &[Point2<f64>; 4], axis: &Vector2<f64>) -> (f64, f64) {
    corners.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
        let d = c.coords.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

fn signed_area(corners: &[Point2<f64>; 4]) -> f64 {
    (0..4)
        .map(|i| {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Footprint {
        Footprint::from_box(&BoundingBox::new([min_x, min_y, 0.0], [max_x, max_y, 0.0]))
    }

    fn assert_same_corners(a: &Footprint, b: &Footprint) {
        for (p, q) in a.corners().iter().zip(b.corners()) {
            assert_relative_eq!(p.x, q.x, epsilon = 1e-9);
            assert_relative_eq!(p.y, q.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn center_and_extents() {
        let fp = unit_box(0.0, 0.0, 2.0, 1.0);
        assert_relative_eq!(fp.center().x, 1.0);
        assert_relative_eq!(fp.center().y, 0.5);
        assert_relative_eq!(fp.extents().x, 2.0);
        assert_relative_eq!(fp.extents().y, 1.0);
        assert_relative_eq!(fp.largest_extent(), 2.0);
    }

    #[test]
    fn translate_keeps_rotation() {
        let fp = unit_box(0.0, 0.0, 2.0, 1.0).rotated(90.0).translated(3.0, -1.0);
        assert_relative_eq!(fp.center().x, 4.0, epsilon = 1e-12);
        assert_relative_eq!(fp.center().y, -0.5, epsilon = 1e-12);
        assert_relative_eq!(fp.rotation_deg(), 90.0);
    }

    #[test]
    fn rotate_quarter_turn_swaps_extents() {
        let fp = unit_box(0.0, 0.0, 4.0, 2.0).rotated(90.0);
        assert_relative_eq!(fp.extents().x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(fp.extents().y, 4.0, epsilon = 1e-9);
        assert_relative_eq!(fp.center().x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(fp.center().y, 1.0, epsilon = 1e-9);
        // Local frame is unchanged by rotation.
        assert_relative_eq!(fp.local_extents().x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(fp.local_extents().y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn half_turn_decomposition_matches_single_rotation() {
        let fp = unit_box(1.0, 2.0, 4.0, 3.0);
        for theta in [0.0, 30.0, 90.0, 180.0, 215.5, 270.0, 359.9, 540.0, -90.0, -200.0] {
            assert_same_corners(&fp.rotated(theta), &fp.rotated_once(theta));
        }
    }

    #[test]
    fn rotation_accumulates_without_wrapping() {
        let fp = unit_box(0.0, 0.0, 1.0, 1.0).rotated(270.0).rotated(180.0);
        assert_relative_eq!(fp.rotation_deg(), 450.0);
    }

    #[test]
    fn rotate_then_undo_restores_corners() {
        let fp = unit_box(0.0, 0.0, 3.0, 1.0);
        let restored = fp.rotated(270.0).rotated(-270.0);
        assert_same_corners(&fp, &restored);
        assert_relative_eq!(restored.rotation_deg(), 0.0);
    }

    #[test]
    fn overlap_detection() {
        let a = unit_box(0.0, 0.0, 2.0, 2.0);
        assert!(a.overlaps(&unit_box(1.0, 1.0, 3.0, 3.0)));
        assert!(!a.overlaps(&unit_box(3.0, 0.0, 4.0, 1.0)));
        // Shared edge is touching, not overlap.
        assert!(!a.overlaps(&unit_box(2.0, 0.0, 3.0, 2.0)));
        // Containment overlaps.
        assert!(a.overlaps(&unit_box(0.5, 0.5, 1.0, 1.0)));
    }

    #[test]
    fn rotated_overlap_uses_true_shape() {
        // A 45 degree diamond whose AABB touches the square but whose body does not.
        let square = unit_box(0.0, 0.0, 1.0, 1.0);
        let diamond = unit_box(1.2, 1.2, 2.2, 2.2).rotated(45.0);
        let (min, _) = diamond.aabb();
        assert!(min.x < 1.0 && min.y < 1.0);
        assert!(!square.overlaps(&diamond));
    }

    #[test]
    fn strict_point_containment() {
        let fp = unit_box(0.0, 0.0, 2.0, 2.0);
        assert!(fp.contains_point_strict(&Point2::new(1.0, 1.0)));
        assert!(!fp.contains_point_strict(&Point2::new(2.0, 1.0)));
        assert!(!fp.contains_point_strict(&Point2::new(3.0, 1.0)));
        let rotated = fp.rotated(45.0);
        assert!(rotated.contains_point_strict(&Point2::new(1.0, 1.0)));
    }
}
