// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Load a plan directory written by the extraction scripts and furnish it.

use floorplan_furnish::{load_legacy_scene, populate_scene, CatalogPolicy, Error, LayoutConfig, Room};
use std::fs;
use std::path::Path;

const ROOMS: &str = "\
Bedroom.001,0,6,6,0,
Bedroom.001,0,0,5,5,
Bedroom.001,0,0,0,0,
Kitchen.002,6,10,10,6,
Kitchen.002,0,0,4,4,
Kitchen.002,0,0,0,0,
Hall,0,1,2,
Hall,0,1,2,
Hall,0,0,0,
";

const OBJECTS: &str = "\
Sink_1,9.2,3.3,0,9.9,3.9,0.9
Door0,2.5,0,0,3.5,0.2,2.1
Door1,6,1.5,0,6.2,2.5,2.1
Window0,0,2,1,0.2,3,2
";

const ROOM_INFO: &str = "\
Bedroom.001
0,
0,

Kitchen.002
1,

Sink_1,
Hall



";

const CATALOG: &str = "\
Bed_1 0 0 0 2.0 1.6 0.5
Desk_1 0 0 0 1.2 0.6 0.75
Chair_1 0 0 0 0.5 0.5 0.9
Counter_1 0 0 0 1.8 0.6 0.9
";

fn write_plan(dir: &Path, objects: &str) {
    fs::write(dir.join("rooms.txt"), ROOMS).unwrap();
    fs::write(dir.join("objects.txt"), objects).unwrap();
    fs::write(dir.join("rooms_info.txt"), ROOM_INFO).unwrap();
    fs::write(dir.join("object_boundbox.txt"), CATALOG).unwrap();
}

#[test]
fn legacy_plan_is_furnished() {
    let dir = tempfile::tempdir().unwrap();
    write_plan(dir.path(), OBJECTS);

    let scene = load_legacy_scene(dir.path()).unwrap();
    assert_eq!(scene.rooms.len(), 3);
    assert_eq!(scene.catalog.len(), 4);
    assert_eq!(scene.rooms[1].obstacles.len(), 2);

    let config = LayoutConfig {
        seed: Some(17),
        timeout_secs: 5.0,
        ..LayoutConfig::default()
    };
    let layout = populate_scene(&scene, &CatalogPolicy::default(), &config);

    // The collinear hall is rejected; the other two are furnished.
    assert_eq!(layout.rejected.len(), 1);
    assert_eq!(layout.rejected[0].room, "Hall");
    assert_eq!(layout.rooms.len(), 2);

    let bedroom = &layout.rooms[0];
    assert_eq!(bedroom.room_type, "Bedroom");
    assert!(bedroom.poses.iter().any(|p| p.category == "Bed"));

    let bedroom_outline =
        Room::from_coords(&[[0.0, 0.0], [6.0, 0.0], [6.0, 5.0], [0.0, 5.0]]).unwrap();
    for pose in &bedroom.poses {
        for corner in &pose.corners {
            let point = nalgebra::Point2::new(corner[0], corner[1]);
            assert!(bedroom_outline.covers_point(&point, 1e-6), "{} leaves the room", pose.id);
        }
        assert!((0.0..360.0).contains(&pose.rotation_deg));
    }
}

#[test]
fn missing_door_record_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let objects: String = OBJECTS
        .lines()
        .filter(|l| !l.starts_with("Door1"))
        .map(|l| format!("{l}\n"))
        .collect();
    write_plan(dir.path(), &objects);

    match load_legacy_scene(dir.path()) {
        Err(Error::MissingEntry(message)) => assert!(message.contains("Door1")),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(load_legacy_scene(dir.path()), Err(Error::Io(_))));
}
