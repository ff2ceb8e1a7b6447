//! Schema-driven reference remapping for content migrations.
//!
//! When a content space is cloned to a new destination, every embedded
//! identifier (story references, asset references, link targets) must be
//! rewritten to point at the corresponding destination entity. This crate is
//! the pure, synchronous engine that does that rewrite:
//!
//! - [`remap_story`] remaps a story's own identifiers and walks its content.
//! - Component instances are dispatched by their schema's field types
//!   ([`FieldType`]); `bloks` recurse, `richtext` documents are walked and
//!   may embed further components.
//! - Everything without a reference is cloned unchanged, in original key order.
//!
//! The identifier maps and schema registry are supplied by the caller and
//! never mutated. Each call owns its own [`Diagnostics`], so stories can be
//! remapped in parallel against shared maps.
//!
//! ```
//! use content_remap_core::{remap_story, IdentifierMaps, RemapOptions, SchemaRegistry};
//! use serde_json::json;
//!
//! let maps = IdentifierMaps::new().with_story(1u64, 100u64);
//! let story = json!({ "id": 1, "parent_id": 0, "name": "Home" });
//!
//! let result = remap_story(&story, &SchemaRegistry::new(), &maps, &RemapOptions::default())
//!     .unwrap();
//! assert_eq!(result.story, json!({ "id": 100, "parent_id": 0, "name": "Home" }));
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod maps;
pub mod pointer;
pub mod schema;

mod remap;
mod story;

pub use config::RemapOptions;
pub use diagnostics::{Diagnostics, ProcessedField};
pub use error::RemapError;
pub use maps::{AssetMapping, IdentifierMaps, StoryRef};
pub use pointer::build_path;
pub use remap::{FieldType, COMPONENT_KEY};
pub use schema::{ComponentDefinition, ComponentSchema, FieldDescriptor, SchemaRegistry};
pub use story::{
    remap_content, remap_stories, remap_story, BatchRemapResult, ContentRemapResult, RemapResult,
};
