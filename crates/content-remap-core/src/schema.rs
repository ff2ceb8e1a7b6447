//! Component schemas: the runtime-supplied type definitions that drive dispatch.
//!
//! The registry is produced by the surrounding pipeline's "fetch all
//! component definitions" step and is read-only here. Only absence is
//! detected; descriptors are never validated beyond their `type` tag.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator between a field's base name and its locale (`title__i18n__de`).
pub const I18N_SEPARATOR: &str = "__i18n__";

/// `options` source whose values are story references.
pub const INTERNAL_STORIES_SOURCE: &str = "internal_stories";

/// Strip a `__i18n__<locale>` suffix, yielding the governing field name.
pub fn strip_locale_suffix(field: &str) -> &str {
    field
        .split_once(I18N_SEPARATOR)
        .map_or(field, |(base, _)| base)
}

/// Declared type and metadata of one schema field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Dispatch key (`bloks`, `richtext`, `asset`, ...).
    #[serde(rename = "type", default)]
    pub field_type: String,
    /// Where an `options` field draws its values from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Every other descriptor attribute, kept opaque.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldDescriptor {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether an `options` field holds story references.
    pub fn is_internal_stories(&self) -> bool {
        self.source.as_deref() == Some(INTERNAL_STORIES_SOURCE)
    }
}

/// Field name → descriptor for one component type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentSchema {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl ComponentSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// Descriptor governing an instance key, locale suffix stripped.
    ///
    /// Returns the base field name alongside the descriptor.
    pub fn resolve<'k>(&self, key: &'k str) -> Option<(&'k str, &FieldDescriptor)> {
        let base = strip_locale_suffix(key);
        self.fields.get(base).map(|descriptor| (base, descriptor))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A component definition as listed by the content store's component API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub name: String,
    #[serde(default)]
    pub schema: ComponentSchema,
}

/// Component type name → schema.
///
/// Deserializes from any of the three shapes the pipeline produces: a plain
/// name → schema object, a list of [`ComponentDefinition`]s, or the API
/// envelope `{ "components": [...] }`. Always serializes as the plain object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SchemaSource", into = "SchemaSource")]
pub struct SchemaRegistry {
    components: HashMap<String, ComponentSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: ComponentSchema) {
        self.components.insert(name.into(), schema);
    }

    pub fn with_component(mut self, name: impl Into<String>, schema: ComponentSchema) -> Self {
        self.insert(name, schema);
        self
    }

    pub fn from_components(definitions: impl IntoIterator<Item = ComponentDefinition>) -> Self {
        Self {
            components: definitions
                .into_iter()
                .map(|def| (def.name, def.schema))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ComponentSchema> {
        self.components.get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum SchemaSource {
    List(Vec<ComponentDefinition>),
    Envelope {
        components: Vec<ComponentDefinition>,
    },
    Registry(BTreeMap<String, ComponentSchema>),
}

impl From<SchemaSource> for SchemaRegistry {
    fn from(source: SchemaSource) -> Self {
        match source {
            SchemaSource::List(definitions) | SchemaSource::Envelope { components: definitions } => {
                Self::from_components(definitions)
            }
            SchemaSource::Registry(map) => Self {
                components: map.into_iter().collect(),
            },
        }
    }
}

impl From<SchemaRegistry> for SchemaSource {
    fn from(registry: SchemaRegistry) -> Self {
        SchemaSource::Registry(registry.components.into_iter().collect())
    }
}
