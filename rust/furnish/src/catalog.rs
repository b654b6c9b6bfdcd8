// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furniture catalog and per-room-type selection policy

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::types::BoundingBox;

/// One concrete item, e.g. `Bed_2`, with its unrotated bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogVariant {
    pub id: String,
    pub bbox: BoundingBox,
}

impl CatalogVariant {
    pub fn new(id: impl Into<String>, bbox: BoundingBox) -> Self {
        Self { id: id.into(), bbox }
    }

    pub fn category(&self) -> &str {
        category_of(&self.id)
    }
}

/// Category of a variant id: the text before the first `_` (`Bed_2` -> `Bed`).
pub fn category_of(id: &str) -> &str {
    id.split('_').next().unwrap_or(id)
}

/// Room type of a room name: the text before the first `.` (`Bedroom.001` -> `Bedroom`).
pub fn room_type_of(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Available variants grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub categories: BTreeMap<String, Vec<CatalogVariant>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group variants by the category prefix of their ids, keeping input order
    /// within each category.
    pub fn from_variants(variants: impl IntoIterator<Item = CatalogVariant>) -> Self {
        let mut catalog = Self::new();
        for variant in variants {
            catalog.insert(variant);
        }
        catalog
    }

    pub fn insert(&mut self, variant: CatalogVariant) {
        self.categories
            .entry(variant.category().to_string())
            .or_default()
            .push(variant);
    }

    /// Variants of a category; empty if the category is unknown.
    pub fn variants(&self, category: &str) -> &[CatalogVariant] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How many items of a category a room type gets and whether they back onto a wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub count: u32,
    /// Push the item flush against the nearest wall; otherwise only orient it
    pub snap: bool,
}

impl CategoryRule {
    pub fn new(category: impl Into<String>, count: u32, snap: bool) -> Self {
        Self {
            category: category.into(),
            count,
            snap,
        }
    }
}

/// Room type -> ordered category rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPolicy {
    pub room_types: BTreeMap<String, Vec<CategoryRule>>,
}

impl Default for CatalogPolicy {
    fn default() -> Self {
        let mut room_types = BTreeMap::new();
        room_types.insert(
            "Bedroom".to_string(),
            vec![
                CategoryRule::new("Bed", 1, true),
                CategoryRule::new("Desk", 1, true),
                CategoryRule::new("Chair", 1, false),
            ],
        );
        room_types.insert(
            "LivingRoom".to_string(),
            vec![
                CategoryRule::new("Sofa", 1, true),
                CategoryRule::new("Bookshelf", 1, true),
                CategoryRule::new("Closet", 1, true),
                CategoryRule::new("Table", 1, false),
            ],
        );
        room_types.insert(
            "Kitchen".to_string(),
            vec![CategoryRule::new("Counter", 1, true)],
        );
        Self { room_types }
    }
}

impl CatalogPolicy {
    pub fn empty() -> Self {
        Self {
            room_types: BTreeMap::new(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Rules for a room type; empty if the type is unknown.
    pub fn rules_for(&self, room_type: &str) -> &[CategoryRule] {
        self.room_types
            .get(room_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// One slot of a room's work list.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkItem {
    pub category: String,
    /// `None` when the catalog has no variant for the category
    pub variant: Option<CatalogVariant>,
    pub snap: bool,
}

/// Expand the rules of `room_type` into an ordered work list.
///
/// Each category starts at a random variant; further slots of the same
/// category cycle through the remaining variants.
pub fn build_work_list<R: Rng + ?Sized>(
    room_type: &str,
    catalog: &Catalog,
    policy: &CatalogPolicy,
    rng: &mut R,
) -> Vec<WorkItem> {
    let mut items = Vec::new();
    for rule in policy.rules_for(room_type) {
        let variants = catalog.variants(&rule.category);
        let start = if variants.is_empty() {
            0
        } else {
            rng.gen_range(0..variants.len())
        };
        for k in 0..rule.count as usize {
            let variant = (!variants.is_empty()).then(|| variants[(start + k) % variants.len()].clone());
            items.push(WorkItem {
                category: rule.category.clone(),
                variant,
                snap: rule.snap,
            });
        }
    }
    items
}
