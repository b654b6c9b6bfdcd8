// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room population: drive the placement search over a room's work list

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{build_work_list, room_type_of, Catalog, CatalogPolicy};
use crate::footprint::Footprint;
use crate::placement::{ItemPlacer, PlacementOutcome};
use crate::room::Room;
use crate::types::{Obstacle, PlacedItem, Pose};

/// Everything placed in one room.
#[derive(Debug, Clone)]
pub struct RoomLayout {
    pub room: String,
    pub room_type: String,
    /// Committed items in placement order
    pub placed: Vec<PlacedItem>,
    /// Variant ids (or bare categories when the catalog had none) that did not fit
    pub unplaced: Vec<String>,
}

impl RoomLayout {
    pub fn report(&self) -> RoomReport {
        RoomReport {
            room: self.room.clone(),
            room_type: self.room_type.clone(),
            poses: self.placed.iter().map(PlacedItem::pose).collect(),
            unplaced: self.unplaced.clone(),
        }
    }
}

/// Serializable summary of a [`RoomLayout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomReport {
    pub room: String,
    pub room_type: String,
    pub poses: Vec<Pose>,
    pub unplaced: Vec<String>,
}

/// Furnish one room.
///
/// Fixed obstacles seed the obstacle list; every committed item is appended
/// to it so later items avoid it. A failed item is dropped, never retried
/// with another variant.
pub fn populate_room<P, R>(
    name: &str,
    room: &Room,
    fixed_obstacles: &[Obstacle],
    catalog: &Catalog,
    policy: &CatalogPolicy,
    placer: &mut P,
    rng: &mut R,
) -> RoomLayout
where
    P: ItemPlacer + ?Sized,
    R: Rng + ?Sized,
{
    let room_type = room_type_of(name);
    let work_list = build_work_list(room_type, catalog, policy, rng);

    let mut obstacles: Vec<Obstacle> = fixed_obstacles.to_vec();
    let mut placed = Vec::new();
    let mut unplaced = Vec::new();

    for item in work_list {
        let Some(variant) = item.variant else {
            tracing::debug!(room = name, category = %item.category, "No catalog variant for category");
            unplaced.push(item.category);
            continue;
        };

        let footprint = Footprint::from_box(&variant.bbox);
        match placer.place(&footprint, room, &obstacles, item.snap) {
            PlacementOutcome::Committed {
                footprint,
                attempts,
                ..
            } => {
                tracing::debug!(
                    room = name,
                    item = %variant.id,
                    attempts,
                    rotation = footprint.rotation_deg(),
                    "Placed item"
                );
                let placed_item = PlacedItem {
                    id: variant.id,
                    category: item.category,
                    footprint,
                };
                obstacles.push(placed_item.to_obstacle());
                placed.push(placed_item);
            }
            PlacementOutcome::Failed { attempts, elapsed } => {
                tracing::debug!(
                    room = name,
                    item = %variant.id,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Could not place item"
                );
                unplaced.push(variant.id);
            }
        }
    }

    tracing::info!(
        room = name,
        room_type,
        placed = placed.len(),
        unplaced = unplaced.len(),
        "Room populated"
    );

    RoomLayout {
        room: name.to_string(),
        room_type: room_type.to_string(),
        placed,
        unplaced,
    }
}
