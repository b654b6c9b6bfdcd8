// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nearest-wall resolution by axis-aligned ray casting
//!
//! Four rays are cast from a point to the room boundary. The closest hit
//! selects the wall an item should back onto, and that wall's inward normal
//! gives the item's orientation.

use nalgebra::{Point2, Vector2};

use crate::footprint::Footprint;
use crate::room::Room;

/// Ray directions in cast order: +x, +y, -x, -y
pub const RAY_DIRECTIONS: [[f64; 2]; 4] = [[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]];

/// Buffer used to find the boundary edge carrying a hit point
pub const EDGE_MATCH_TOLERANCE: f64 = 1e-5;

/// Reference direction an unrotated item faces away from
const REFERENCE_DIRECTION: [f64; 2] = [0.0, -1.0];

/// Result of casting the four rays.
#[derive(Debug, Clone, PartialEq)]
pub struct RayTrace {
    pub hits: [Point2<f64>; 4],
    pub distances: [f64; 4],
    /// Index of the closest hit; the earliest ray wins ties
    pub nearest: usize,
}

impl RayTrace {
    pub fn nearest_hit(&self) -> Point2<f64> {
        self.hits[self.nearest]
    }

    pub fn nearest_distance(&self) -> f64 {
        self.distances[self.nearest]
    }
}

/// Orientation derived from the nearest wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallOrientation {
    /// Angle in `[0, 360)` between the wall's inward normal and `(0, -1)`
    pub theta_deg: f64,
    /// Closest boundary hit, the point an item snaps against
    pub snap_point: Point2<f64>,
    /// Index into [`Room::boundary_edges`]
    pub edge_index: usize,
    /// Unit normal of that edge pointing into the room
    pub inward_normal: Vector2<f64>,
    pub trace: RayTrace,
}

/// Cast the four axis-aligned rays from `point` and record the closest
/// boundary crossing of each.
///
/// Returns `None` if a ray finds no boundary within `max(room extents)`, which
/// only happens for points outside the room.
pub fn ray_trace(room: &Room, point: &Point2<f64>) -> Option<RayTrace> {
    let extents = room.extents();
    let reach = extents.x.max(extents.y);
    let edges = room.boundary_edges();

    let mut hits = [*point; 4];
    let mut distances = [0.0; 4];

    for (i, dir) in RAY_DIRECTIONS.iter().enumerate() {
        let direction = Vector2::new(dir[0], dir[1]);
        let t = edges
            .iter()
            .filter_map(|e| e.ray_hit(point, &direction, reach))
            .min_by(|a, b| a.total_cmp(b))?;
        hits[i] = point + direction * t;
        distances[i] = t;
    }

    let mut nearest = 0;
    for i in 1..4 {
        if distances[i] < distances[nearest] {
            nearest = i;
        }
    }

    Some(RayTrace {
        hits,
        distances,
        nearest,
    })
}

/// Find the wall closest to the footprint's center and the angle that turns
/// the footprint to face away from it.
pub fn orient_to_nearest_wall(room: &Room, footprint: &Footprint) -> Option<WallOrientation> {
    let trace = ray_trace(room, &footprint.center())?;
    let snap_point = trace.nearest_hit();

    let edges = room.boundary_edges();
    let edge_index = edges
        .iter()
        .position(|e| e.distance_to(&snap_point) <= EDGE_MATCH_TOLERANCE)?;

    let direction = edges[edge_index].vector().try_normalize(f64::EPSILON)?;
    // Rotate by -90 degrees; the room is clockwise so this points inward.
    let inward_normal = Vector2::new(direction.y, -direction.x);

    let reference = Vector2::new(REFERENCE_DIRECTION[0], REFERENCE_DIRECTION[1]);
    let cos = inward_normal.dot(&reference).clamp(-1.0, 1.0);
    let mut theta_deg = cos.acos().to_degrees();
    if inward_normal.x < 0.0 {
        theta_deg = 360.0 - theta_deg;
    }

    Some(WallOrientation {
        theta_deg,
        snap_point,
        edge_index,
        inward_normal,
        trace,
    })
}
