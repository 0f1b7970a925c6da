//! The furniture catalog data model.
//!
//! Mirrors the on-wire shape of `gamedata/FurnitureData.json`:
//!
//! ```json
//! {
//!   "roomitemtypes": { "furnitype": [ ... ] },
//!   "wallitemtypes": { "furnitype": [ ... ] }
//! }
//! ```
//!
//! Unknown keys are ignored on load; writes emit only the known fields.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Maximum classname length accepted by validation.
pub const MAX_CLASSNAME_LEN: usize = 70;

/// Nested part-color list carried by some floor items.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartColors {
    #[serde(default)]
    pub color: Vec<String>,
}

impl PartColors {
    pub fn is_empty(&self) -> bool {
        self.color.is_empty()
    }
}

/// One furniture definition from the catalog.
///
/// The serde field names double as the stable machine-readable tags used by
/// the per-dialect column mappings (see [`crate::field::FieldTag`]).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub classname: String,
    #[serde(default)]
    pub revision: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub adurl: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub offerid: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub buyout: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub rentofferid: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub rentbuyout: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bc: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub excludeddynamic: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub customparams: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub specialtype: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub furniline: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub environment: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub rare: bool,

    // Floor item specifics; wall items simply omit these.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub defaultdir: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub xdim: i64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub ydim: i64,
    #[serde(default, skip_serializing_if = "PartColors::is_empty")]
    pub partcolors: PartColors,
    #[serde(default, skip_serializing_if = "is_false")]
    pub canstandon: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub cansiton: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub canlayon: bool,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl CatalogItem {
    /// The basename of the item's storage bundle: the classname truncated at
    /// the first `*`, plus the `.nitro` extension.
    ///
    /// This is the sole link between the catalog, the database, and storage.
    pub fn stored_object_name(&self) -> String {
        stored_object_name(&self.classname)
    }

    /// Validate the minimum field requirements of a catalog entry.
    ///
    /// Returns a human-readable problem description, or `None` when the entry
    /// is well-formed. `revision = 0` is accepted.
    pub fn validate(&self) -> Option<&'static str> {
        if self.id <= 0 {
            return Some("missing id");
        }
        if self.classname.is_empty() {
            return Some("missing classname");
        }
        if self.classname.chars().count() > MAX_CLASSNAME_LEN {
            return Some("classname exceeds 70 characters");
        }
        let (base, variant) = match self.classname.split_once('*') {
            Some((base, variant)) => (base, Some(variant)),
            None => (self.classname.as_str(), None),
        };
        if base.is_empty() {
            return Some("classname has empty base");
        }
        if !base
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Some("classname contains invalid characters");
        }
        if variant.is_some_and(str::is_empty) {
            return Some("classname has empty variant");
        }
        if self.name.is_empty() {
            return Some("missing name");
        }
        if self.category.is_empty() {
            return Some("missing category");
        }
        None
    }
}

/// Compute the storage basename for a classname.
pub fn stored_object_name(classname: &str) -> String {
    let base = match classname.split_once('*') {
        Some((base, _)) => base,
        None => classname,
    };
    format!("{base}.nitro")
}

/// One bucket of catalog items (floor or wall).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBucket {
    #[serde(rename = "furnitype", default)]
    pub furni_type: Vec<CatalogItem>,
}

/// The canonical catalog document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "roomitemtypes", default)]
    pub room_item_types: ItemBucket,
    #[serde(rename = "wallitemtypes", default)]
    pub wall_item_types: ItemBucket,
}

impl Catalog {
    /// Parse a catalog from raw JSON. Unknown fields are ignored.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(|e| Error::Malformed(e.to_string()))
    }

    /// Serialize with 2-space indentation, the format the catalog file is
    /// stored in.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Iterate all items, room bucket before wall bucket.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.room_item_types
            .furni_type
            .iter()
            .chain(self.wall_item_types.furni_type.iter())
    }

    /// Deduplicate items by id. When the same id appears more than once
    /// (within or across buckets), the last occurrence wins.
    pub fn active_items(&self) -> HashMap<i64, CatalogItem> {
        let mut active = HashMap::new();
        for item in self.items() {
            active.insert(item.id, item.clone());
        }
        active
    }

    /// Remove every item whose id is in `ids`, from both buckets.
    pub fn remove_ids(&mut self, ids: &HashSet<i64>) {
        self.room_item_types
            .furni_type
            .retain(|item| !ids.contains(&item.id));
        self.wall_item_types
            .furni_type
            .retain(|item| !ids.contains(&item.id));
    }

    /// Total number of entries across both buckets, duplicates included.
    pub fn len(&self) -> usize {
        self.room_item_types.furni_type.len() + self.wall_item_types.furni_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
