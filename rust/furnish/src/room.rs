// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room boundary polygons
//!
//! A [`Room`] is validated once at construction and never changes afterwards.
//! Its winding is normalised to clockwise: rotating any boundary edge's
//! direction by -90 degrees then points into the room.

use nalgebra::{Point2, Vector2};
use rand::Rng;

use crate::error::{Error, Result};
use crate::footprint::Footprint;

/// Tolerance for a footprint corner lying on the room boundary
pub const BOUNDARY_TOLERANCE: f64 = 1e-7;

/// Rooms smaller than this are treated as degenerate
const MIN_ROOM_AREA: f64 = 1e-9;

const EPSILON: f64 = 1e-12;

/// One edge of a room boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn vector(&self) -> Vector2<f64> {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Distance from `point` to the closest point of the segment.
    pub fn distance_to(&self, point: &Point2<f64>) -> f64 {
        let ab = self.vector();
        let len_sq = ab.norm_squared();
        if len_sq < EPSILON {
            return (point - self.start).norm();
        }
        let t = ((point - self.start).dot(&ab) / len_sq).clamp(0.0, 1.0);
        (point - (self.start + ab * t)).norm()
    }

    /// Parameter `t` along `direction` (unit) at which the ray from `origin`
    /// crosses this segment, if it does so within `max_len`.
    pub fn ray_hit(&self, origin: &Point2<f64>, direction: &Vector2<f64>, max_len: f64) -> Option<f64> {
        let edge = self.vector();
        let denom = direction.perp(&edge);
        if denom.abs() < EPSILON {
            // Parallel rays graze along the edge; the adjoining edges report the hit.
            return None;
        }
        let to_start = self.start - origin;
        let t = to_start.perp(&edge) / denom;
        let u = to_start.perp(direction) / denom;
        let tol = 1e-9;
        if t >= -tol && t <= max_len + tol && (-tol..=1.0 + tol).contains(&u) {
            Some(t.max(0.0))
        } else {
            None
        }
    }

    fn crosses(&self, other: &Segment) -> bool {
        let d1 = orient(&other.start, &other.end, &self.start);
        let d2 = orient(&other.start, &other.end, &self.end);
        let d3 = orient(&self.start, &self.end, &other.start);
        let d4 = orient(&self.start, &self.end, &other.end);

        if ((d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON))
            && ((d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON))
        {
            return true;
        }
        // Collinear or touching configurations
        (d1.abs() <= EPSILON && on_segment(&other.start, &other.end, &self.start))
            || (d2.abs() <= EPSILON && on_segment(&other.start, &other.end, &self.end))
            || (d3.abs() <= EPSILON && on_segment(&self.start, &self.end, &other.start))
            || (d4.abs() <= EPSILON && on_segment(&self.start, &self.end, &other.end))
    }
}

fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b - a).perp(&(c - a))
}

fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

/// A simple room polygon with its axis-aligned bounds.
#[derive(Debug, Clone)]
pub struct Room {
    vertices: Vec<Point2<f64>>,
    min: Point2<f64>,
    max: Point2<f64>,
}

impl Room {
    /// Validate and build a room from its boundary vertices.
    ///
    /// A repeated closing vertex and consecutive duplicates are dropped. Rooms
    /// with fewer than three vertices, no area, or crossing edges are rejected.
    pub fn new(vertices: Vec<Point2<f64>>) -> Result<Self> {
        if vertices.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(Error::InvalidRoom("non-finite vertex".into()));
        }

        let mut cleaned: Vec<Point2<f64>> = Vec::with_capacity(vertices.len());
        for p in vertices {
            if cleaned.last().map_or(true, |last| (p - last).norm() > EPSILON) {
                cleaned.push(p);
            }
        }
        while cleaned.len() > 1 && (cleaned[0] - cleaned[cleaned.len() - 1]).norm() <= EPSILON {
            cleaned.pop();
        }

        if cleaned.len() < 3 {
            return Err(Error::InvalidRoom(format!(
                "need at least 3 distinct vertices, got {}",
                cleaned.len()
            )));
        }

        let area = signed_area(&cleaned);
        if area.abs() < MIN_ROOM_AREA {
            return Err(Error::InvalidRoom("polygon has no area".into()));
        }
        if area > 0.0 {
            cleaned.reverse();
        }

        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &cleaned {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        let room = Self {
            vertices: cleaned,
            min,
            max,
        };

        if let Some((i, j)) = room.first_self_intersection() {
            return Err(Error::InvalidRoom(format!(
                "edges {i} and {j} intersect"
            )));
        }

        Ok(room)
    }

    pub fn from_coords(coords: &[[f64; 2]]) -> Result<Self> {
        Self::new(coords.iter().map(|c| Point2::new(c[0], c[1])).collect())
    }

    /// Boundary vertices in clockwise order, without the closing repeat.
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    pub fn bounds(&self) -> (Point2<f64>, Point2<f64>) {
        (self.min, self.max)
    }

    /// Width and height of the bounding box.
    pub fn extents(&self) -> Vector2<f64> {
        self.max - self.min
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    /// Boundary edges in order, the last one closing back to the first vertex.
    pub fn boundary_edges(&self) -> Vec<Segment> {
        let n = self.vertices.len();
        (0..n)
            .map(|i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
            .collect()
    }

    /// True if `point` is strictly inside the polygon (not on its boundary).
    pub fn contains_point(&self, point: &Point2<f64>) -> bool {
        point_in_polygon(point, &self.vertices)
            && self
                .boundary_edges()
                .iter()
                .all(|e| e.distance_to(point) > EPSILON)
    }

    /// True if `point` is inside or within `tolerance` of the boundary.
    pub fn covers_point(&self, point: &Point2<f64>, tolerance: f64) -> bool {
        point_in_polygon(point, &self.vertices)
            || self
                .boundary_edges()
                .iter()
                .any(|e| e.distance_to(point) <= tolerance)
    }

    /// True if the whole footprint lies within the room.
    ///
    /// Every corner must be covered and no room vertex may poke into the
    /// rectangle, which catches reflex corners of non-convex rooms.
    pub fn contains_footprint(&self, footprint: &Footprint) -> bool {
        footprint
            .corners()
            .iter()
            .all(|c| self.covers_point(c, BOUNDARY_TOLERANCE))
            && self.covers_point(&footprint.center(), BOUNDARY_TOLERANCE)
            && !self
                .vertices
                .iter()
                .any(|v| footprint.contains_point_strict(v))
    }

    /// Draw one uniform point from the bounding box; `None` if it falls outside
    /// the polygon.
    pub fn sample_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Point2<f64>> {
        let extents = self.extents();
        let p = Point2::new(
            self.min.x + extents.x * rng.gen::<f64>(),
            self.min.y + extents.y * rng.gen::<f64>(),
        );
        self.contains_point(&p).then_some(p)
    }

    /// Rejection-sample a uniform point strictly inside the room.
    pub fn random_point_inside<R: Rng + ?Sized>(&self, rng: &mut R) -> Point2<f64> {
        loop {
            if let Some(p) = self.sample_point(rng) {
                return p;
            }
        }
    }

    fn first_self_intersection(&self) -> Option<(usize, usize)> {
        let edges = self.boundary_edges();
        let n = edges.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                if !adjacent && edges[i].crosses(&edges[j]) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

/// Shoelace area, positive for counter-clockwise polygons.
fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

/// 2D ray-casting point-in-polygon test.
fn point_in_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    let mut inside = false;

    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}
