// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seeded end-to-end runs checking that every committed layout is contained,
//! collision free and clear of doors.

use floorplan_furnish::{
    populate_room, populate_scene, validate, BoundingBox, Catalog, CatalogPolicy, CatalogVariant,
    CategoryRule, Footprint, LayoutConfig, Obstacle, ObstacleInput, ObstacleKind,
    PlacementConfig, PlacementOutcome, Placer, Room, RoomInput, Scene, SnapMode,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

fn bbox(x0: f64, y0: f64, x1: f64, y1: f64) -> BoundingBox {
    BoundingBox::new([x0, y0, 0.0], [x1, y1, 1.0])
}

fn catalog() -> Catalog {
    Catalog::from_variants([
        CatalogVariant::new("Bed_1", bbox(0.0, 0.0, 2.0, 1.6)),
        CatalogVariant::new("Bed_2", bbox(0.0, 0.0, 1.9, 0.9)),
        CatalogVariant::new("Desk_1", bbox(0.0, 0.0, 1.2, 0.6)),
        CatalogVariant::new("Chair_1", bbox(0.0, 0.0, 0.5, 0.5)),
        CatalogVariant::new("Chair_2", bbox(0.0, 0.0, 0.45, 0.55)),
        CatalogVariant::new("Bookshelf_1", bbox(0.0, 0.0, 1.0, 0.35)),
    ])
}

fn crowded_policy() -> CatalogPolicy {
    let mut policy = CatalogPolicy::empty();
    policy.room_types.insert(
        "Bedroom".into(),
        vec![
            CategoryRule::new("Bed", 1, true),
            CategoryRule::new("Desk", 1, true),
            CategoryRule::new("Bookshelf", 2, true),
            CategoryRule::new("Chair", 3, false),
        ],
    );
    policy
}

fn fixed_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::fixed("Door0", &bbox(2.5, 0.0, 3.5, 0.2)),
        Obstacle::fixed("Window0", &bbox(0.0, 2.0, 0.2, 3.0)),
        Obstacle::fixed("Wardrobe_1", &bbox(5.0, 4.0, 6.0, 5.0)),
    ]
}

fn quick_config(snap_mode: SnapMode) -> PlacementConfig {
    PlacementConfig {
        timeout: Duration::from_millis(300),
        max_attempts: None,
        snap_mode,
    }
}

fn assert_layout_valid(room: &Room, fixed: &[Obstacle], placed: &[Footprint]) {
    for (i, footprint) in placed.iter().enumerate() {
        let mut others: Vec<Obstacle> = fixed.to_vec();
        others.extend(
            placed
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(j, f)| Obstacle::new(format!("item{j}"), ObstacleKind::Furniture, f.clone())),
        );
        assert_eq!(validate(footprint, room, &others), None, "item {i} invalid");
    }
}

#[test]
fn seeded_layouts_satisfy_invariants() {
    let rooms = [
        Room::from_coords(&[[0.0, 0.0], [6.0, 0.0], [6.0, 5.0], [0.0, 5.0]]).unwrap(),
        Room::from_coords(&[[0.0, 0.0], [7.0, 0.0], [7.0, 3.0], [3.5, 3.0], [3.5, 6.0], [0.0, 6.0]]).unwrap(),
    ];
    let fixed = fixed_obstacles();
    let catalog = catalog();
    let policy = crowded_policy();

    for room in &rooms {
        for seed in 0..4u64 {
            for mode in [SnapMode::Cardinal, SnapMode::WallNormal] {
                let mut placer = Placer::new(StdRng::seed_from_u64(seed + 100), quick_config(mode));
                let mut rng = StdRng::seed_from_u64(seed);
                let layout = populate_room("Bedroom.001", room, &fixed, &catalog, &policy, &mut placer, &mut rng);

                assert_eq!(layout.placed.len() + layout.unplaced.len(), 7);
                let footprints: Vec<Footprint> = layout.placed.iter().map(|p| p.footprint.clone()).collect();
                assert_layout_valid(room, &fixed, &footprints);
            }
        }
    }
}

#[test]
fn items_keep_clear_of_the_door() {
    let room = Room::from_coords(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]).unwrap();
    let door = Obstacle::fixed("Door0", &bbox(5.0, 0.0, 7.0, 0.1));
    let door_center = door.footprint.center();
    let mut policy = CatalogPolicy::empty();
    policy
        .room_types
        .insert("Bedroom".into(), vec![CategoryRule::new("Chair", 6, false)]);

    let mut placer = Placer::new(StdRng::seed_from_u64(5), quick_config(SnapMode::Cardinal));
    let mut rng = StdRng::seed_from_u64(5);
    let layout = populate_room(
        "Bedroom",
        &room,
        std::slice::from_ref(&door),
        &catalog(),
        &policy,
        &mut placer,
        &mut rng,
    );

    assert!(!layout.placed.is_empty());
    for item in &layout.placed {
        let required = door.footprint.largest_extent() + item.footprint.largest_extent() / 2.0;
        let distance = (item.footprint.center() - door_center).norm();
        assert!(distance >= required, "{} at distance {distance}", item.id);
    }
}

#[test]
fn sampling_stays_out_of_the_notch() {
    let room = Room::from_coords(&[[0.0, 0.0], [4.0, 0.0], [4.0, 2.0], [2.0, 2.0], [2.0, 4.0], [0.0, 4.0]]).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..2000 {
        let p = room.random_point_inside(&mut rng);
        assert!(!(p.x > 2.0 && p.y > 2.0), "sampled ({}, {}) in the notch", p.x, p.y);
        assert!(room.contains_point(&p));
    }
}

#[test]
fn impossible_item_fails_within_budget() {
    let room = Room::from_coords(&[[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]]).unwrap();
    let huge = Footprint::from_box(&bbox(0.0, 0.0, 5.0, 5.0));
    let mut placer = Placer::new(
        StdRng::seed_from_u64(1),
        PlacementConfig {
            timeout: Duration::from_millis(200),
            ..PlacementConfig::default()
        },
    );

    let start = Instant::now();
    let outcome = placer.place(&huge, &room, &[], true);
    let wall = start.elapsed();

    match outcome {
        PlacementOutcome::Failed { attempts, elapsed } => {
            assert_eq!(attempts, 0);
            assert!(elapsed > Duration::from_millis(200));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(wall < Duration::from_secs(5));
}

#[test]
fn scene_runs_are_reproducible_across_schedulers() {
    let room = |name: &str, dx: f64| RoomInput {
        name: name.into(),
        boundary: vec![[dx, 0.0], [dx + 8.0, 0.0], [dx + 8.0, 8.0], [dx, 8.0]],
        obstacles: vec![ObstacleInput {
            name: "Door0".into(),
            bbox: bbox(dx + 3.0, 0.0, dx + 4.0, 0.2),
            kind: None,
        }],
    };
    let scene = Scene {
        rooms: vec![room("Bedroom.001", 0.0), room("Bedroom.002", 10.0), room("Bedroom.003", 20.0)],
        catalog: catalog(),
    };
    let sequential = LayoutConfig {
        seed: Some(2024),
        timeout_secs: 30.0,
        max_attempts: Some(500),
        parallel: false,
        ..LayoutConfig::default()
    };
    let parallel = LayoutConfig {
        parallel: true,
        ..sequential.clone()
    };

    let a = populate_scene(&scene, &CatalogPolicy::default(), &sequential);
    let b = populate_scene(&scene, &CatalogPolicy::default(), &parallel);
    assert_eq!(a, b);
    assert_eq!(a.rooms.len(), 3);
    assert!(a.placed_count() > 0);
}
