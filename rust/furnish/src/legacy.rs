// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loaders for the comma/space separated text files written by the floor
//! plan extraction scripts.
//!
//! A plan directory holds four files:
//!
//! - `rooms.txt`: three lines per room, `name,x0,x1,...`, `name,y0,...`, `name,z0,...`
//! - `objects.txt`: `name,xmin,ymin,zmin,xmax,ymax,zmax` for icons, `Door{i}` and `Window{i}`
//! - `rooms_info.txt`: four lines per room: name, door indices, window
//!   indices, existing object names (each list comma terminated, possibly empty)
//! - `object_boundbox.txt`: the catalog, `Variant_N xmin ymin zmin xmax ymax zmax`

use rustc_hash::FxHashMap;
use std::path::Path;

use crate::catalog::{Catalog, CatalogVariant};
use crate::error::{Error, Result};
use crate::scene::{ObstacleInput, RoomInput, Scene};
use crate::types::BoundingBox;

pub const ROOMS_FILE: &str = "rooms.txt";
pub const OBJECTS_FILE: &str = "objects.txt";
pub const ROOM_INFO_FILE: &str = "rooms_info.txt";
pub const CATALOG_FILE: &str = "object_boundbox.txt";

/// Raw room outline from `rooms.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRoom {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl LegacyRoom {
    pub fn boundary(&self) -> Vec<[f64; 2]> {
        self.x.iter().zip(&self.y).map(|(&x, &y)| [x, y]).collect()
    }
}

/// One `rooms_info.txt` record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomInfo {
    pub name: String,
    pub doors: Vec<usize>,
    pub windows: Vec<usize>,
    pub objects: Vec<String>,
}

impl RoomInfo {
    /// Obstacle names in the order they are loaded: existing objects, then
    /// `Door{i}`, then `Window{i}`.
    pub fn obstacle_names(&self) -> Vec<String> {
        self.objects
            .iter()
            .cloned()
            .chain(self.doors.iter().map(|i| format!("Door{i}")))
            .chain(self.windows.iter().map(|i| format!("Window{i}")))
            .collect()
    }
}

/// Comma separated fields with empty trailing entries dropped.
fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim).filter(|f| !f.is_empty())
}

fn parse_floats<'a>(
    file: &str,
    line: usize,
    values: impl Iterator<Item = &'a str>,
) -> Result<Vec<f64>> {
    values
        .map(|v| {
            v.parse::<f64>()
                .map_err(|e| Error::parse(file, line, format!("'{v}': {e}")))
        })
        .collect()
}

fn parse_box<'a>(file: &str, line: usize, values: impl Iterator<Item = &'a str>) -> Result<BoundingBox> {
    let values = parse_floats(file, line, values)?;
    BoundingBox::from_slice(&values).map_err(|e| Error::parse(file, line, e.to_string()))
}

/// Non-blank lines with their 1-based line numbers.
fn content_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

/// Parse `rooms.txt`.
pub fn parse_rooms(content: &str) -> Result<Vec<LegacyRoom>> {
    let lines: Vec<(usize, &str)> = content_lines(content).collect();
    if lines.len() % 3 != 0 {
        let (line, _) = lines[lines.len() - lines.len() % 3];
        return Err(Error::parse(ROOMS_FILE, line, "incomplete x/y/z triple"));
    }

    let mut rooms = Vec::with_capacity(lines.len() / 3);
    for triple in lines.chunks(3) {
        let mut coords = Vec::with_capacity(3);
        let mut name = String::new();
        for &(line, text) in triple {
            let mut parts = fields(text);
            let Some(row_name) = parts.next() else {
                return Err(Error::parse(ROOMS_FILE, line, "missing room name"));
            };
            if name.is_empty() {
                name = row_name.to_string();
            }
            coords.push(parse_floats(ROOMS_FILE, line, parts)?);
        }
        let (x_line, _) = triple[0];
        let z = coords.pop().unwrap_or_default();
        let y = coords.pop().unwrap_or_default();
        let x = coords.pop().unwrap_or_default();
        if x.len() != y.len() {
            return Err(Error::parse(
                ROOMS_FILE,
                x_line,
                format!("room '{name}' has {} x and {} y coordinates", x.len(), y.len()),
            ));
        }
        rooms.push(LegacyRoom { name, x, y, z });
    }
    Ok(rooms)
}

/// Parse `objects.txt` into name -> box.
pub fn parse_objects(content: &str) -> Result<FxHashMap<String, BoundingBox>> {
    let mut objects = FxHashMap::default();
    for (line, text) in content_lines(content) {
        let mut parts = fields(text);
        let Some(name) = parts.next() else {
            continue;
        };
        let bbox = parse_box(OBJECTS_FILE, line, parts)?;
        objects.insert(name.to_string(), bbox);
    }
    Ok(objects)
}

/// Parse `rooms_info.txt`. Blank lines are meaningful here (a room without
/// doors has an empty door line), so records are exact four-line groups.
pub fn parse_room_info(content: &str) -> Result<Vec<RoomInfo>> {
    let mut lines: Vec<&str> = content.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) && lines.len() % 4 != 0 {
        lines.pop();
    }
    if lines.len() % 4 != 0 {
        return Err(Error::parse(ROOM_INFO_FILE, lines.len(), "incomplete four-line record"));
    }

    let indices = |line: usize, text: &str| -> Result<Vec<usize>> {
        fields(text)
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|e| Error::parse(ROOM_INFO_FILE, line, format!("'{v}': {e}")))
            })
            .collect()
    };

    let mut infos = Vec::with_capacity(lines.len() / 4);
    for (record, chunk) in lines.chunks(4).enumerate() {
        let first = record * 4 + 1;
        let name = chunk[0].trim();
        if name.is_empty() {
            return Err(Error::parse(ROOM_INFO_FILE, first, "missing room name"));
        }
        infos.push(RoomInfo {
            name: name.to_string(),
            doors: indices(first + 1, chunk[1])?,
            windows: indices(first + 2, chunk[2])?,
            objects: fields(chunk[3]).map(str::to_string).collect(),
        });
    }
    Ok(infos)
}

/// Parse `object_boundbox.txt`.
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    for (line, text) in content_lines(content) {
        let mut parts = text.split_whitespace();
        let Some(id) = parts.next() else {
            continue;
        };
        let bbox = parse_box(CATALOG_FILE, line, parts)?;
        catalog.insert(CatalogVariant::new(id, bbox));
    }
    Ok(catalog)
}

/// Assemble a [`Scene`] from parsed legacy records.
///
/// Rooms keep the `rooms.txt` order. A room without a `rooms_info.txt`
/// record gets no obstacles; an obstacle name missing from `objects.txt` is
/// an error.
pub fn assemble_scene(
    rooms: Vec<LegacyRoom>,
    objects: &FxHashMap<String, BoundingBox>,
    infos: Vec<RoomInfo>,
    catalog: Catalog,
) -> Result<Scene> {
    let mut infos: FxHashMap<String, RoomInfo> =
        infos.into_iter().map(|i| (i.name.clone(), i)).collect();

    let mut inputs = Vec::with_capacity(rooms.len());
    for room in rooms {
        let obstacles = match infos.remove(&room.name) {
            Some(info) => info
                .obstacle_names()
                .into_iter()
                .map(|name| -> Result<ObstacleInput> {
                    let bbox = objects.get(&name).copied().ok_or_else(|| {
                        Error::MissingEntry(format!("object '{name}' referenced by room '{}'", room.name))
                    })?;
                    Ok(ObstacleInput {
                        name,
                        bbox,
                        kind: None,
                    })
                })
                .collect::<Result<Vec<ObstacleInput>>>()?,
            None => {
                tracing::debug!(room = %room.name, "No room info record");
                Vec::new()
            }
        };
        inputs.push(RoomInput {
            boundary: room.boundary(),
            name: room.name,
            obstacles,
        });
    }

    for name in infos.keys() {
        tracing::warn!(room = %name, "Room info record without room outline");
    }

    Ok(Scene {
        rooms: inputs,
        catalog,
    })
}

/// Load a plan directory written by the extraction scripts.
pub fn load_legacy_scene(dir: impl AsRef<Path>) -> Result<Scene> {
    let dir = dir.as_ref();
    let read = |file: &str| std::fs::read_to_string(dir.join(file));

    let rooms = parse_rooms(&read(ROOMS_FILE)?)?;
    let objects = parse_objects(&read(OBJECTS_FILE)?)?;
    let infos = parse_room_info(&read(ROOM_INFO_FILE)?)?;
    let catalog = parse_catalog(&read(CATALOG_FILE)?)?;

    tracing::info!(
        dir = %dir.display(),
        rooms = rooms.len(),
        objects = objects.len(),
        variants = catalog.len(),
        "Loaded legacy plan"
    );

    assemble_scene(rooms, &objects, infos, catalog)
}
