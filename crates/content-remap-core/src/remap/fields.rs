//! Field-type dispatch table.
//!
//! One arm per schema field type that can carry a cross-reference. Any other
//! declared type (`text`, `markdown`, `number`, custom plugins, ...) has no
//! dispatcher and its value is kept as-is by the traverser.

use serde_json::{Map, Value};

use super::Remapper;
use crate::error::RemapError;
use crate::maps::numeric_id;
use crate::pointer::index_path;
use crate::schema::FieldDescriptor;

/// Schema field types with a remapping dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Single asset record; replaced by the destination record.
    Asset,
    /// Array of asset records.
    Multiasset,
    /// Link descriptor; story links are remapped by id.
    Multilink,
    /// Array of nested component instances.
    Bloks,
    /// Array of scalars; story references when sourced from internal stories.
    Options,
    /// Rich-text document.
    Richtext,
}

impl FieldType {
    pub const ALL: [FieldType; 6] = [
        FieldType::Asset,
        FieldType::Multiasset,
        FieldType::Multilink,
        FieldType::Bloks,
        FieldType::Options,
        FieldType::Richtext,
    ];

    /// Look up the dispatcher for a declared type name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "asset" => Some(FieldType::Asset),
            "multiasset" => Some(FieldType::Multiasset),
            "multilink" => Some(FieldType::Multilink),
            "bloks" => Some(FieldType::Bloks),
            "options" => Some(FieldType::Options),
            "richtext" => Some(FieldType::Richtext),
            _ => None,
        }
    }

    pub fn from_descriptor(descriptor: &FieldDescriptor) -> Option<Self> {
        Self::parse(&descriptor.field_type)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Asset => "asset",
            FieldType::Multiasset => "multiasset",
            FieldType::Multilink => "multilink",
            FieldType::Bloks => "bloks",
            FieldType::Options => "options",
            FieldType::Richtext => "richtext",
        }
    }
}

impl Remapper<'_> {
    /// Run the dispatcher for `field_type` on a field value.
    ///
    /// `depth` is the depth of the owning component.
    pub(super) fn field(
        &mut self,
        field_type: FieldType,
        value: &Value,
        descriptor: &FieldDescriptor,
        path: &str,
        depth: usize,
    ) -> Result<Value, RemapError> {
        tracing::trace!(path, field_type = field_type.as_str(), "dispatching field");
        match field_type {
            FieldType::Asset => Ok(self.asset(value)),
            FieldType::Multiasset => self.multiasset(value, path),
            FieldType::Multilink => Ok(self.multilink(value)),
            FieldType::Bloks => self.bloks(value, path, depth),
            FieldType::Options => Ok(self.options(value, descriptor)),
            FieldType::Richtext => self.rich_node(value, path, depth + 1),
        }
    }

    /// Merge the destination record over the original; keys only the
    /// original has (alt text, copyright, ...) survive.
    fn asset(&self, value: &Value) -> Value {
        let record = match value.as_object() {
            Some(record) => record,
            None => return value.clone(),
        };
        let mapping = match record
            .get("id")
            .and_then(numeric_id)
            .and_then(|id| self.maps.asset(id))
        {
            Some(mapping) => mapping,
            None => return value.clone(),
        };

        let mut merged: Map<String, Value> = record.clone();
        for (key, replacement) in &mapping.new {
            merged.insert(key.clone(), replacement.clone());
        }
        Value::Object(merged)
    }

    fn multiasset(&self, value: &Value, path: &str) -> Result<Value, RemapError> {
        let assets = value
            .as_array()
            .ok_or_else(|| RemapError::invalid_shape(path, "array", value))?;
        Ok(Value::Array(
            assets.iter().map(|asset| self.asset(asset)).collect(),
        ))
    }

    fn multilink(&self, value: &Value) -> Value {
        let link = match value.as_object() {
            Some(link) if link.get("linktype").and_then(Value::as_str) == Some("story") => link,
            _ => return value.clone(),
        };

        let mut out = link.clone();
        if let Some(id) = link.get("id") {
            out.insert("id".to_string(), self.maps.resolve_story(id));
        }
        Value::Object(out)
    }

    fn bloks(&mut self, value: &Value, path: &str, depth: usize) -> Result<Value, RemapError> {
        let items = value
            .as_array()
            .ok_or_else(|| RemapError::invalid_shape(path, "array", value))?;
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            out.push(self.component(item, &index_path(path, index), depth + 1)?);
        }
        Ok(Value::Array(out))
    }

    /// Element-wise story remap, only for `source: internal_stories`.
    /// Elements without a mapping keep their value.
    fn options(&self, value: &Value, descriptor: &FieldDescriptor) -> Value {
        match value.as_array() {
            Some(items) if descriptor.is_internal_stories() => Value::Array(
                items
                    .iter()
                    .map(|item| self.maps.resolve_story(item))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }
}
