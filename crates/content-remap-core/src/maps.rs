//! Identifier maps: old → new lookups produced by the entity-creation phase.
//!
//! Story references come in two flavors (numeric ids and string UUIDs) and
//! are kept apart by type: the number `12` and the string `"12"` are
//! different keys. Asset references map to a complete replacement record.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A story identifier as it appears in content: numeric id or string UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryRef {
    Id(u64),
    Uuid(String),
}

impl StoryRef {
    /// Read a story reference out of a JSON value.
    ///
    /// Only non-negative integers (see [`numeric_id`]) and strings qualify;
    /// anything else (fractions, objects, null) can never match a map entry.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(StoryRef::Uuid(s.clone())),
            other => numeric_id(other).map(StoryRef::Id),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            StoryRef::Id(id) => Value::from(*id),
            StoryRef::Uuid(uuid) => Value::String(uuid.clone()),
        }
    }
}

impl From<u64> for StoryRef {
    fn from(id: u64) -> Self {
        StoryRef::Id(id)
    }
}

impl From<&str> for StoryRef {
    fn from(uuid: &str) -> Self {
        StoryRef::Uuid(uuid.to_string())
    }
}

impl From<String> for StoryRef {
    fn from(uuid: String) -> Self {
        StoryRef::Uuid(uuid)
    }
}

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A numeric identifier as a map key.
///
/// Exports sometimes encode ids as floats (`101.0`); an integral float in
/// the safe range is the same key as the integer.
pub fn numeric_id(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n,
        _ => return None,
    };
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && (0.0..=MAX_SAFE_INTEGER).contains(f))
            .map(|f| f as u64)
    })
}

/// Replacement for a migrated asset.
///
/// Holds the full destination record, not just its id: filename, metadata
/// and id all change together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMapping {
    pub new: Map<String, Value>,
}

/// Read-only lookup tables consumed by the remapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IdentifierMapsRepr", into = "IdentifierMapsRepr")]
pub struct IdentifierMaps {
    stories: HashMap<StoryRef, StoryRef>,
    assets: HashMap<u64, AssetMapping>,
}

impl IdentifierMaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that story `old` became `new` in the destination.
    pub fn insert_story(
        &mut self,
        old: impl Into<StoryRef>,
        new: impl Into<StoryRef>,
    ) -> Option<StoryRef> {
        self.stories.insert(old.into(), new.into())
    }

    /// Record the destination record for source asset `old_id`.
    pub fn insert_asset(&mut self, old_id: u64, record: Map<String, Value>) -> Option<AssetMapping> {
        self.assets.insert(old_id, AssetMapping { new: record })
    }

    /// Builder-style [`insert_story`](Self::insert_story).
    pub fn with_story(mut self, old: impl Into<StoryRef>, new: impl Into<StoryRef>) -> Self {
        self.insert_story(old, new);
        self
    }

    /// Builder-style [`insert_asset`](Self::insert_asset).
    pub fn with_asset(mut self, old_id: u64, record: Map<String, Value>) -> Self {
        self.insert_asset(old_id, record);
        self
    }

    /// Mapped identifier for a JSON story reference, if the map has one.
    pub fn lookup_story(&self, value: &Value) -> Option<Value> {
        let key = StoryRef::from_value(value)?;
        self.stories.get(&key).map(StoryRef::to_value)
    }

    /// Mapped identifier, falling back to the original value.
    pub fn resolve_story(&self, value: &Value) -> Value {
        self.lookup_story(value).unwrap_or_else(|| value.clone())
    }

    pub fn asset(&self, old_id: u64) -> Option<&AssetMapping> {
        self.assets.get(&old_id)
    }

    pub fn story_count(&self) -> usize {
        self.stories.len()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty() && self.assets.is_empty()
    }
}

/// Serialized form: lists of `[old, new]` pairs, which keep numeric and
/// string keys distinct where a JSON object would not.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IdentifierMapsRepr {
    #[serde(default)]
    stories: Vec<(StoryRef, StoryRef)>,
    #[serde(default)]
    assets: Vec<(u64, AssetMapping)>,
}

impl From<IdentifierMapsRepr> for IdentifierMaps {
    fn from(repr: IdentifierMapsRepr) -> Self {
        Self {
            stories: repr.stories.into_iter().collect(),
            assets: repr.assets.into_iter().collect(),
        }
    }
}

impl From<IdentifierMaps> for IdentifierMapsRepr {
    fn from(maps: IdentifierMaps) -> Self {
        let mut stories: Vec<_> = maps.stories.into_iter().collect();
        stories.sort();
        let mut assets: Vec<_> = maps.assets.into_iter().collect();
        assets.sort_by_key(|(id, _)| *id);
        Self { stories, assets }
    }
}
