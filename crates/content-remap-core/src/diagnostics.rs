//! Diagnostics accumulated during one remap call.
//!
//! The pipeline uses these for reporting ("3 components used a type that is
//! missing from the destination schema import").

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::schema::FieldDescriptor;

/// A schema field that was visited while remapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessedField {
    /// Component type owning the field.
    pub component: String,
    /// Base field name (locale suffix stripped).
    pub field: String,
    /// Declared type of the field.
    pub field_type: String,
}

/// Visited field descriptors and missing component types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub processed_fields: BTreeSet<ProcessedField>,
    pub missing_schemas: BTreeSet<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_field(
        &mut self,
        component: &str,
        field: &str,
        descriptor: &FieldDescriptor,
    ) {
        self.processed_fields.insert(ProcessedField {
            component: component.to_string(),
            field: field.to_string(),
            field_type: descriptor.field_type.clone(),
        });
    }

    pub(crate) fn record_missing_schema(&mut self, component: &str) {
        if !self.missing_schemas.contains(component) {
            tracing::debug!(component, "no schema for component type");
            self.missing_schemas.insert(component.to_string());
        }
    }

    /// Fold another call's diagnostics into this one (batch reporting).
    pub fn merge(&mut self, other: Diagnostics) {
        self.processed_fields.extend(other.processed_fields);
        self.missing_schemas.extend(other.missing_schemas);
    }

    pub fn has_missing_schemas(&self) -> bool {
        !self.missing_schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_deduplicated() {
        let mut diagnostics = Diagnostics::new();
        let descriptor = FieldDescriptor::new("bloks");

        diagnostics.record_field("page", "body", &descriptor);
        diagnostics.record_field("page", "body", &descriptor);
        diagnostics.record_missing_schema("ghost");
        diagnostics.record_missing_schema("ghost");

        assert_eq!(diagnostics.processed_fields.len(), 1);
        assert_eq!(diagnostics.missing_schemas.len(), 1);
    }

    #[test]
    fn test_merge_is_ordered_union() {
        let mut left = Diagnostics::new();
        left.record_missing_schema("zeta");
        let mut right = Diagnostics::new();
        right.record_missing_schema("alpha");
        right.record_missing_schema("zeta");

        left.merge(right);

        let names: Vec<_> = left.missing_schemas.iter().map(String::as_str).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert!(left.has_missing_schemas());
    }
}
