//! Remapper: schema-driven traversal of component trees.
//!
//! A [`Remapper`] lives for exactly one top-level call. It owns the
//! diagnostics accumulator and borrows the read-only schema registry and
//! identifier maps. Component traversal ([`Remapper::component`]), field
//! dispatch (`fields`) and rich-text walking (`richtext`) are mutually
//! recursive methods on it: `bloks` fields and embedded `blok` nodes re-enter
//! the component traverser at arbitrary depth.

mod fields;
mod richtext;

pub use fields::FieldType;

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::config::RemapOptions;
use crate::diagnostics::Diagnostics;
use crate::error::RemapError;
use crate::maps::IdentifierMaps;
use crate::pointer::build_path;
use crate::schema::SchemaRegistry;

/// Reserved key naming a component instance's type.
pub const COMPONENT_KEY: &str = "component";

pub(crate) struct Remapper<'a> {
    schemas: &'a SchemaRegistry,
    maps: &'a IdentifierMaps,
    options: &'a RemapOptions,
    diagnostics: Diagnostics,
}

impl<'a> Remapper<'a> {
    pub(crate) fn new(
        schemas: &'a SchemaRegistry,
        maps: &'a IdentifierMaps,
        options: &'a RemapOptions,
    ) -> Self {
        Self {
            schemas,
            maps,
            options,
            diagnostics: Diagnostics::new(),
        }
    }

    pub(crate) fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    fn check_depth(&self, path: &str, depth: usize) -> Result<(), RemapError> {
        if depth > self.options.max_depth {
            return Err(RemapError::RecursionDepthExceeded {
                path: path.to_string(),
                max_depth: self.options.max_depth,
            });
        }
        Ok(())
    }

    /// Remap one component instance against its schema.
    ///
    /// - `null` becomes an empty object.
    /// - Values without a truthy `component` are returned unchanged and
    ///   nothing is recorded.
    /// - An unknown component type is recorded as missing and the instance is
    ///   returned unchanged; its fields are never guessed at.
    /// - Otherwise every field governed by a descriptor with a dispatcher is
    ///   replaced by the dispatcher's output. Key order is preserved.
    pub(crate) fn component(
        &mut self,
        instance: &Value,
        path: &str,
        depth: usize,
    ) -> Result<Value, RemapError> {
        self.check_depth(path, depth)?;

        let fields = match instance {
            Value::Object(fields) => fields,
            Value::Null => return Ok(Value::Object(Map::new())),
            other => return Ok(other.clone()),
        };

        let name = match component_name(instance) {
            Some(name) => name,
            None => return Ok(instance.clone()),
        };

        let schemas = self.schemas;
        let schema = match schemas.get(&name) {
            Some(schema) => schema,
            None => {
                self.diagnostics.record_missing_schema(&name);
                return Ok(instance.clone());
            }
        };

        let mut result = Map::with_capacity(fields.len());
        for (key, value) in fields {
            let mapped = match schema.resolve(key) {
                Some((field, descriptor)) => {
                    self.diagnostics.record_field(&name, field, descriptor);
                    match FieldType::from_descriptor(descriptor) {
                        Some(field_type) => {
                            let field_path = build_path(path, &[key]);
                            self.field(field_type, value, descriptor, &field_path, depth)?
                        }
                        None => value.clone(),
                    }
                }
                None => value.clone(),
            };
            result.insert(key.clone(), mapped);
        }

        Ok(Value::Object(result))
    }
}

/// The component type name, if `value` is an instance carrying a truthy one.
///
/// `""`, `0`, `false` and `null` mark a schema-less value. Any other
/// non-string is looked up by its string form (`5` is type `"5"`), so it
/// shows up as a missing schema instead of vanishing silently.
pub(crate) fn component_name(value: &Value) -> Option<Cow<'_, str>> {
    match value.get(COMPONENT_KEY)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(name) if name.is_empty() => None,
        Value::String(name) => Some(Cow::Borrowed(name)),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ComponentSchema, FieldDescriptor};
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new()
            .with_component(
                "page",
                ComponentSchema::new()
                    .with_field("title", FieldDescriptor::new("text"))
                    .with_field("body", FieldDescriptor::new("bloks"))
                    .with_field("link", FieldDescriptor::new("multilink")),
            )
            .with_component(
                "teaser",
                ComponentSchema::new().with_field("target", FieldDescriptor::new("multilink")),
            )
    }

    fn run(instance: &Value, maps: &IdentifierMaps) -> (Value, Diagnostics) {
        let schemas = registry();
        let options = RemapOptions::default();
        let mut remapper = Remapper::new(&schemas, maps, &options);
        let out = remapper.component(instance, "#", 0).unwrap();
        (out, remapper.into_diagnostics())
    }

    #[test]
    fn test_null_instance_becomes_empty_object() {
        let (out, diagnostics) = run(&json!(null), &IdentifierMaps::new());
        assert_eq!(out, json!({}));
        assert_eq!(diagnostics, Diagnostics::new());
    }

    #[test]
    fn test_instance_without_component_is_untouched() {
        let instance = json!({ "_uid": "x", "link": { "linktype": "story", "id": 1 } });
        let maps = IdentifierMaps::new().with_story(1u64, 2u64);

        let (out, diagnostics) = run(&instance, &maps);
        assert_eq!(out, instance);
        assert!(diagnostics.missing_schemas.is_empty());
        assert!(diagnostics.processed_fields.is_empty());
    }

    #[test]
    fn test_empty_component_name_is_schema_less() {
        let instance = json!({ "component": "", "body": {} });
        let (out, diagnostics) = run(&instance, &IdentifierMaps::new());
        assert_eq!(out, instance);
        assert!(diagnostics.missing_schemas.is_empty());
    }

    #[test]
    fn test_falsy_component_is_schema_less() {
        for instance in [
            json!({ "component": 0, "_uid": "x" }),
            json!({ "component": false, "_uid": "x" }),
            json!({ "component": null, "_uid": "x" }),
        ] {
            let (out, diagnostics) = run(&instance, &IdentifierMaps::new());
            assert_eq!(out, instance);
            assert!(diagnostics.missing_schemas.is_empty());
        }
    }

    #[test]
    fn test_truthy_non_string_component_reported_missing() {
        let instance = json!({ "component": 5, "_uid": "x" });
        let (out, diagnostics) = run(&instance, &IdentifierMaps::new());
        assert_eq!(out, instance);
        assert_eq!(diagnostics.missing_schemas.iter().collect::<Vec<_>>(), ["5"]);

        let instance = json!({ "component": true, "link": { "linktype": "story", "id": 1 } });
        let (out, diagnostics) = run(&instance, &IdentifierMaps::new().with_story(1u64, 2u64));
        assert_eq!(out, instance);
        assert!(diagnostics.missing_schemas.contains("true"));
    }

    #[test]
    fn test_unknown_component_recorded_and_untouched() {
        let instance = json!({ "component": "ghost", "body": "not an array" });
        let (out, diagnostics) = run(&instance, &IdentifierMaps::new());
        assert_eq!(out, instance);
        assert!(diagnostics.missing_schemas.contains("ghost"));
    }

    #[test]
    fn test_nested_bloks_and_locale_fields() {
        let maps = IdentifierMaps::new().with_story("old", "new");
        let instance = json!({
            "component": "page",
            "title": "Hello",
            "body__i18n__de": [
                { "component": "teaser", "target": { "linktype": "story", "id": "old" } }
            ],
            "untyped": { "linktype": "story", "id": "old" }
        });

        let (out, diagnostics) = run(&instance, &maps);

        assert_eq!(out["body__i18n__de"][0]["target"]["id"], json!("new"));
        assert_eq!(out["untyped"]["id"], json!("old"));
        assert_eq!(out["title"], json!("Hello"));

        let visited: Vec<_> = diagnostics
            .processed_fields
            .iter()
            .map(|f| (f.component.as_str(), f.field.as_str()))
            .collect();
        assert_eq!(visited, [("page", "body"), ("page", "title"), ("teaser", "target")]);
    }

    #[test]
    fn test_key_order_preserved() {
        let instance = json!({ "zeta": 1, "component": "page", "alpha": 2, "title": "t" });
        let (out, _) = run(&instance, &IdentifierMaps::new());
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "component", "alpha", "title"]);
    }

    #[test]
    fn test_depth_guard() {
        let schemas = registry();
        let maps = IdentifierMaps::new();
        let options = RemapOptions { max_depth: 1 };
        let mut remapper = Remapper::new(&schemas, &maps, &options);

        let instance = json!({
            "component": "page",
            "body": [{ "component": "page", "body": [{ "component": "page", "body": [] }] }]
        });

        let err = remapper.component(&instance, "#", 0).unwrap_err();
        assert!(matches!(
            err,
            RemapError::RecursionDepthExceeded { max_depth: 1, .. }
        ));
    }
}
