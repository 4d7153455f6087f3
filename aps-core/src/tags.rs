//! Tag reconciliation between desired and previously applied tag sets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tag values are nullable; a missing value and an empty string are distinct.
pub type TagMap = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// Mutations needed to move a resource from one tag set to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub to_change: TagMap,
    pub to_remove: BTreeSet<String>,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.to_change.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute the tags to add or change and the tag keys to remove.
pub fn diff(current: &TagMap, previous: &TagMap) -> TagDiff {
    let to_remove = previous
        .keys()
        .filter(|key| !current.contains_key(*key))
        .cloned()
        .collect();

    let to_change = current
        .iter()
        .filter(|(key, value)| previous.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    TagDiff {
        to_change,
        to_remove,
    }
}

/// Later entries win when a key repeats.
pub fn tags_to_map(tags: &[Tag]) -> TagMap {
    tags.iter()
        .map(|tag| (tag.key.clone(), tag.value.clone()))
        .collect()
}

pub fn map_to_tags(map: &TagMap) -> Vec<Tag> {
    map.iter()
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Overlay `overrides` onto `base`, replacing values for shared keys.
pub fn merge_into(base: &mut TagMap, overrides: &BTreeMap<String, String>) {
    for (key, value) in overrides {
        base.insert(key.clone(), Some(value.clone()));
    }
}
