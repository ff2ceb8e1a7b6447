//! Story-level remapping: the entry points of the engine.
//!
//! A story's own identifying fields (`id`, `uuid`, `parent_id`, `alternates`)
//! are remapped directly; its `content` goes through the component traverser.
//! All other story fields pass through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::RemapOptions;
use crate::diagnostics::Diagnostics;
use crate::error::RemapError;
use crate::maps::IdentifierMaps;
use crate::remap::{component_name, Remapper};
use crate::schema::SchemaRegistry;

/// Result of remapping one story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemapResult {
    /// The story with every reference pointing at the destination.
    pub story: Value,
    /// Fields visited and component types missing from the registry.
    pub diagnostics: Diagnostics,
}

/// Result of remapping a bare component tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRemapResult {
    pub content: Value,
    pub diagnostics: Diagnostics,
}

/// Result of remapping a batch of stories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRemapResult {
    /// Per-story results, in input order.
    pub results: Vec<RemapResult>,
    /// Union of every story's diagnostics.
    pub diagnostics: Diagnostics,
}

/// Remap a story's identifiers and content.
///
/// Returns an error only for input-shape violations (the story is not an
/// object, or a `bloks`/`multiasset` field is not an array) and for content
/// nested deeper than `options.max_depth`.
pub fn remap_story(
    story: &Value,
    schemas: &SchemaRegistry,
    maps: &IdentifierMaps,
    options: &RemapOptions,
) -> Result<RemapResult, RemapError> {
    let fields = story
        .as_object()
        .ok_or_else(|| RemapError::invalid_shape("#", "object", story))?;

    let mut remapper = Remapper::new(schemas, maps, options);
    let mut result = Map::with_capacity(fields.len());

    for (key, value) in fields {
        let mapped = match key.as_str() {
            "id" => to_number(maps.resolve_story(value), value),
            "uuid" => to_string(maps.resolve_story(value), value),
            "parent_id" => remap_parent_id(value, maps),
            "alternates" => remap_alternates(value, maps),
            // Folders and other content-less stories pass through.
            "content" if component_name(value).is_some() => {
                remapper.component(value, "#/content", 1)?
            }
            _ => value.clone(),
        };
        result.insert(key.clone(), mapped);
    }

    let diagnostics = remapper.into_diagnostics();
    let id = fields.get("id").unwrap_or(&Value::Null);
    tracing::debug!(
        id = %id,
        processed_fields = diagnostics.processed_fields.len(),
        missing_schemas = diagnostics.missing_schemas.len(),
        "remapped story"
    );

    Ok(RemapResult {
        story: Value::Object(result),
        diagnostics,
    })
}

/// Remap a component tree outside of a story (e.g. a component preset).
pub fn remap_content(
    content: &Value,
    schemas: &SchemaRegistry,
    maps: &IdentifierMaps,
    options: &RemapOptions,
) -> Result<ContentRemapResult, RemapError> {
    let mut remapper = Remapper::new(schemas, maps, options);
    let content = remapper.component(content, "#", 0)?;
    Ok(ContentRemapResult {
        content,
        diagnostics: remapper.into_diagnostics(),
    })
}

/// Remap many stories, each with its own isolated diagnostics.
///
/// Stops at the first story that fails, reporting its index.
pub fn remap_stories(
    stories: &[Value],
    schemas: &SchemaRegistry,
    maps: &IdentifierMaps,
    options: &RemapOptions,
) -> Result<BatchRemapResult, RemapError> {
    let mut results = Vec::with_capacity(stories.len());
    let mut diagnostics = Diagnostics::new();

    for (index, story) in stories.iter().enumerate() {
        let result = remap_story(story, schemas, maps, options).map_err(|source| {
            RemapError::BatchItem {
                index,
                source: Box::new(source),
            }
        })?;
        diagnostics.merge(result.diagnostics.clone());
        results.push(result);
    }

    Ok(BatchRemapResult {
        results,
        diagnostics,
    })
}

/// `parent_id`: remapped, then coerced to a number. `0` (root) stays `0`
/// and `null` stays `null`.
fn remap_parent_id(value: &Value, maps: &IdentifierMaps) -> Value {
    match maps.resolve_story(value) {
        Value::Null => Value::Null,
        resolved => to_number(resolved, value),
    }
}

/// Remap `id` and `parent_id` of each alternate entry that has them.
fn remap_alternates(value: &Value, maps: &IdentifierMaps) -> Value {
    let alternates = match value.as_array() {
        Some(alternates) => alternates,
        None => return value.clone(),
    };

    Value::Array(
        alternates
            .iter()
            .map(|alternate| match alternate.as_object() {
                Some(entry) => {
                    let mut out = entry.clone();
                    for key in ["id", "parent_id"] {
                        if let Some(id) = entry.get(key) {
                            out.insert(key.to_string(), maps.resolve_story(id));
                        }
                    }
                    Value::Object(out)
                }
                None => alternate.clone(),
            })
            .collect(),
    )
}

/// Coerce a resolved identifier to a JSON number.
///
/// Numeric strings are parsed; anything else that is not already a number
/// keeps the original value.
fn to_number(resolved: Value, original: &Value) -> Value {
    match resolved {
        Value::Number(_) | Value::Null => resolved,
        Value::String(ref s) => match s.trim().parse::<u64>() {
            Ok(n) => Value::from(n),
            Err(_) => {
                tracing::warn!(value = %s, "story identifier is not numeric, keeping original");
                original.clone()
            }
        },
        other => {
            tracing::warn!(value = %other, "story identifier is not numeric, keeping original");
            original.clone()
        }
    }
}

/// Coerce a resolved identifier to a JSON string.
fn to_string(resolved: Value, original: &Value) -> Value {
    match resolved {
        Value::String(_) | Value::Null => resolved,
        Value::Number(n) => Value::String(n.to_string()),
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Array(_) | Value::Object(_) => original.clone(),
    }
}
