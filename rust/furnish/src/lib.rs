// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Floorplan Furnish
//!
//! Automatic furniture layout for rooms extracted from 2D floor plans.
//!
//! Each room is a simple polygon with fixed obstacles (doors, windows,
//! existing fixtures). For every catalog item the room type calls for, a
//! randomised search draws a point inside the room, rotates the item to face
//! its nearest wall, optionally pushes it flush against that wall, and
//! commits it once it is contained, collision free and clear of every door.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use floorplan_furnish::{load_legacy_scene, populate_scene, CatalogPolicy, LayoutConfig};
//!
//! let scene = load_legacy_scene("plans/0042")?;
//! let config = LayoutConfig { seed: Some(7), ..LayoutConfig::from_env() };
//! let layout = populate_scene(&scene, &CatalogPolicy::default(), &config);
//!
//! for room in &layout.rooms {
//!     for pose in &room.poses {
//!         println!("{} {} at {:?}, {} deg", room.room, pose.id, pose.center, pose.rotation_deg);
//!     }
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod footprint;
pub mod legacy;
pub mod placement;
pub mod populate;
pub mod resolver;
pub mod room;
pub mod scene;
pub mod types;

pub use catalog::{
    build_work_list, category_of, room_type_of, Catalog, CatalogPolicy, CatalogVariant,
    CategoryRule, WorkItem,
};
pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use footprint::Footprint;
pub use legacy::load_legacy_scene;
pub use placement::{
    validate, Clock, ItemPlacer, MonotonicClock, PlacementConfig, PlacementOutcome, Placer,
    Rejection, SnapMode, StepClock,
};
pub use populate::{populate_room, RoomLayout, RoomReport};
pub use resolver::{orient_to_nearest_wall, ray_trace, RayTrace, WallOrientation};
pub use room::{Room, Segment};
pub use scene::{
    load_scene_json, populate_scene, ObstacleInput, RejectedRoom, RoomInput, Scene, SceneLayout,
};
pub use types::{BoundingBox, Obstacle, ObstacleKind, PlacedItem, Pose};
