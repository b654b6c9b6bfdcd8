// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types shared by the loaders, the placement search and the orchestrator

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::footprint::Footprint;

/// Axis-aligned 3D box as produced by the floor plan extraction stage.
///
/// Serialized as the six floats `[xmin, ymin, zmin, xmax, ymax, zmax]`. Only
/// the planar part takes part in placement; z is carried for bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 6]")]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Build from six floats, rejecting non-finite values and inverted ranges.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() != 6 {
            return Err(Error::InvalidBox(format!(
                "expected 6 values, got {}",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidBox(format!("non-finite value in {values:?}")));
        }
        let bbox = Self::new(
            [values[0], values[1], values[2]],
            [values[3], values[4], values[5]],
        );
        if (0..3).any(|i| bbox.min[i] > bbox.max[i]) {
            return Err(Error::InvalidBox(format!("min exceeds max in {values:?}")));
        }
        Ok(bbox)
    }
}

impl TryFrom<Vec<f64>> for BoundingBox {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_slice(&values)
    }
}

impl From<BoundingBox> for [f64; 6] {
    fn from(b: BoundingBox) -> Self {
        [b.min[0], b.min[1], b.min[2], b.max[0], b.max[1], b.max[2]]
    }
}

/// Obstacle classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Door,
    Window,
    Wall,
    /// Pre-existing fixture extracted from the plan (sink, toilet, ...)
    Fixture,
    /// Item committed by the placement search
    Furniture,
}

impl ObstacleKind {
    /// Classify a fixed obstacle by its name (`Door3`, `Window_Walls1`, ...).
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("door") {
            ObstacleKind::Door
        } else if lower.contains("window") {
            ObstacleKind::Window
        } else if lower.contains("wall") {
            ObstacleKind::Wall
        } else {
            ObstacleKind::Fixture
        }
    }
}

/// Anything a candidate item must keep clear of.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub name: String,
    pub kind: ObstacleKind,
    pub footprint: Footprint,
}

impl Obstacle {
    pub fn new(name: impl Into<String>, kind: ObstacleKind, footprint: Footprint) -> Self {
        Self {
            name: name.into(),
            kind,
            footprint,
        }
    }

    /// Fixed obstacle classified from its name.
    pub fn fixed(name: impl Into<String>, bbox: &BoundingBox) -> Self {
        let name = name.into();
        let kind = ObstacleKind::from_name(&name);
        Self::new(name, kind, Footprint::from_box(bbox))
    }

    pub fn is_door(&self) -> bool {
        self.kind == ObstacleKind::Door
    }

    /// Windows sit in the wall above the floor, so items may stand under them.
    pub fn blocks_placement(&self) -> bool {
        self.kind != ObstacleKind::Window
    }
}

/// An item committed to a room by the placement search.
#[derive(Debug, Clone)]
pub struct PlacedItem {
    /// Catalog variant id (`Bed_2`)
    pub id: String,
    pub category: String,
    pub footprint: Footprint,
}

impl PlacedItem {
    pub fn center(&self) -> [f64; 2] {
        let c = self.footprint.center();
        [c.x, c.y]
    }

    /// Cumulative rotation, as accumulated by the search.
    pub fn rotation_deg(&self) -> f64 {
        self.footprint.rotation_deg()
    }

    /// Rotation reduced to `[0, 360)` for reporting.
    pub fn reported_rotation_deg(&self) -> f64 {
        let deg = self.rotation_deg().rem_euclid(360.0);
        // rem_euclid rounds tiny negative angles up to exactly 360
        if deg >= 360.0 {
            0.0
        } else {
            deg
        }
    }

    pub fn to_obstacle(&self) -> Obstacle {
        Obstacle::new(self.id.clone(), ObstacleKind::Furniture, self.footprint.clone())
    }

    pub fn pose(&self) -> Pose {
        Pose {
            id: self.id.clone(),
            category: self.category.clone(),
            center: self.center(),
            rotation_deg: self.reported_rotation_deg(),
            corners: self.footprint.corners().map(|c| [c.x, c.y]),
        }
    }
}

/// Serializable pose handed to the scene-construction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub id: String,
    pub category: String,
    pub center: [f64; 2],
    /// Rotation in degrees, reduced to `[0, 360)`
    pub rotation_deg: f64,
    pub corners: [[f64; 2]; 4],
}
