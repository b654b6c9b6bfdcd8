// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-plan input and output: every room of a floor plan plus the catalog

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::{Catalog, CatalogPolicy};
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::placement::Placer;
use crate::populate::{populate_room, RoomReport};
use crate::room::Room;
use crate::types::{BoundingBox, Obstacle, ObstacleKind};

/// A fixed obstacle as supplied by the extraction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleInput {
    pub name: String,
    pub bbox: BoundingBox,
    /// Overrides the classification derived from the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObstacleKind>,
}

impl ObstacleInput {
    pub fn to_obstacle(&self) -> Obstacle {
        let mut obstacle = Obstacle::fixed(self.name.clone(), &self.bbox);
        if let Some(kind) = self.kind {
            obstacle.kind = kind;
        }
        obstacle
    }
}

/// One room of the plan with its doors, windows, walls and existing fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInput {
    pub name: String,
    pub boundary: Vec<[f64; 2]>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleInput>,
}

/// Input for a whole plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub rooms: Vec<RoomInput>,
    #[serde(default)]
    pub catalog: Catalog,
}

/// Read a [`Scene`] from a JSON file.
pub fn load_scene_json(path: impl AsRef<Path>) -> Result<Scene> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// A room that could not be furnished because its polygon is unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRoom {
    pub room: String,
    pub reason: String,
}

/// Output for a whole plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    pub rooms: Vec<RoomReport>,
    pub rejected: Vec<RejectedRoom>,
}

impl SceneLayout {
    pub fn placed_count(&self) -> usize {
        self.rooms.iter().map(|r| r.poses.len()).sum()
    }
}

/// Furnish every room of the scene.
///
/// Rooms share nothing: each gets its own random stream (derived from
/// `config.seed` and the room index when a seed is set), its own placer and
/// its own obstacle list, so they can run on the rayon pool.
pub fn populate_scene(scene: &Scene, policy: &CatalogPolicy, config: &LayoutConfig) -> SceneLayout {
    let furnish = |(index, input): (usize, &RoomInput)| -> std::result::Result<RoomReport, RejectedRoom> {
        let room = Room::from_coords(&input.boundary).map_err(|e| {
            tracing::warn!(room = %input.name, error = %e, "Skipping room");
            RejectedRoom {
                room: input.name.clone(),
                reason: e.to_string(),
            }
        })?;
        let obstacles: Vec<Obstacle> = input.obstacles.iter().map(ObstacleInput::to_obstacle).collect();

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_entropy(),
        };
        let mut placer = Placer::new(StdRng::seed_from_u64(rng.gen()), config.placement());

        let layout = populate_room(
            &input.name,
            &room,
            &obstacles,
            &scene.catalog,
            policy,
            &mut placer,
            &mut rng,
        );
        Ok(layout.report())
    };

    let results: Vec<_> = if config.parallel {
        scene.rooms.par_iter().enumerate().map(furnish).collect()
    } else {
        scene.rooms.iter().enumerate().map(furnish).collect()
    };

    let mut layout = SceneLayout::default();
    for result in results {
        match result {
            Ok(report) => layout.rooms.push(report),
            Err(rejected) => layout.rejected.push(rejected),
        }
    }

    tracing::info!(
        rooms = layout.rooms.len(),
        rejected = layout.rejected.len(),
        placed = layout.placed_count(),
        "Scene populated"
    );
    layout
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE_JSON: &str = r#"{
        "rooms": [
            {
                "name": "Bedroom.001",
                "boundary": [[0, 0], [6, 0], [6, 5], [0, 5]],
                "obstacles": [
                    {"name": "Door0", "bbox": [2.5, 0.0, 0.0, 3.5, 0.2, 2.1]},
                    {"name": "Window0", "bbox": [0.0, 2.0, 1.0, 0.2, 3.0, 2.0]}
                ]
            },
            {
                "name": "Kitchen",
                "boundary": [[0, 0], [1, 1], [2, 2]]
            }
        ],
        "catalog": {
            "categories": {
                "Bed": [{"id": "Bed_1", "bbox": [0, 0, 0, 2.0, 1.6, 0.5]}],
                "Desk": [{"id": "Desk_1", "bbox": [0, 0, 0, 1.2, 0.6, 0.8]}]
            }
        }
    }"#;

    #[test]
    fn scene_parses_and_classifies_obstacles() {
        let scene: Scene = serde_json::from_str(SCENE_JSON).unwrap();
        assert_eq!(scene.rooms.len(), 2);
        let kinds: Vec<ObstacleKind> = scene.rooms[0]
            .obstacles
            .iter()
            .map(|o| o.to_obstacle().kind)
            .collect();
        assert_eq!(kinds, [ObstacleKind::Door, ObstacleKind::Window]);
        assert_eq!(scene.catalog.len(), 2);
    }

    #[test]
    fn explicit_kind_overrides_name() {
        let input = ObstacleInput {
            name: "Opening3".into(),
            bbox: BoundingBox::new([0.0, 0.0, 0.0], [1.0, 0.2, 2.0]),
            kind: Some(ObstacleKind::Door),
        };
        assert!(input.to_obstacle().is_door());
    }

    #[test]
    fn degenerate_rooms_are_rejected_not_fatal() {
        let scene: Scene = serde_json::from_str(SCENE_JSON).unwrap();
        let config = LayoutConfig {
            seed: Some(3),
            parallel: false,
            timeout_secs: 0.5,
            ..LayoutConfig::default()
        };
        let layout = populate_scene(&scene, &CatalogPolicy::default(), &config);
        assert_eq!(layout.rooms.len(), 1);
        assert_eq!(layout.rooms[0].room_type, "Bedroom");
        assert_eq!(layout.rejected.len(), 1);
        assert_eq!(layout.rejected[0].room, "Kitchen");
        // Chair has no variants in the catalog.
        assert!(layout.rooms[0].unplaced.contains(&"Chair".to_string()));
    }
}
