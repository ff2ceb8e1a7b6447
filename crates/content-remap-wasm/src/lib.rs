//! WASM bindings for content-remap.
//!
//! Exposes `remapStory` and `remapContent` via `wasm-bindgen` so a JS
//! migration pipeline can call the engine once per story. Uses
//! `serde-wasm-bindgen` for JS ↔ serde_json::Value marshalling; results are
//! emitted JSON-compatible (plain objects, safe integers as numbers).

use content_remap_core::{IdentifierMaps, RemapOptions, SchemaRegistry};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module and install the panic hook.
///
/// Called automatically when the WASM module loads (`#[wasm_bindgen(start)]`).
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Remap a story's identifiers and content.
///
/// Accepts the story, the schema registry (plain object, component list or
/// `{components}` envelope), the identifier maps (`{stories, assets}` as
/// `[old, new]` pair lists) and optional options (`{"max-depth": n}`).
/// Returns a JS object: `{ story, diagnostics }`.
#[wasm_bindgen(js_name = remapStory)]
pub fn remap_story(
    story: JsValue,
    schemas: JsValue,
    maps: JsValue,
    options: JsValue,
) -> Result<JsValue, JsError> {
    let story: serde_json::Value = serde_wasm_bindgen::from_value(story)?;
    let (schemas, maps, options) = parse_inputs(schemas, maps, options)?;

    let result = content_remap_core::remap_story(&story, &schemas, &maps, &options)
        .map_err(|e| JsError::new(&e.to_string()))?;

    to_js(&result)
}

/// Remap a bare component tree (e.g. a component preset).
///
/// Returns a JS object: `{ content, diagnostics }`.
#[wasm_bindgen(js_name = remapContent)]
pub fn remap_content(
    content: JsValue,
    schemas: JsValue,
    maps: JsValue,
    options: JsValue,
) -> Result<JsValue, JsError> {
    let content: serde_json::Value = serde_wasm_bindgen::from_value(content)?;
    let (schemas, maps, options) = parse_inputs(schemas, maps, options)?;

    let result = content_remap_core::remap_content(&content, &schemas, &maps, &options)
        .map_err(|e| JsError::new(&e.to_string()))?;

    to_js(&result)
}

fn parse_inputs(
    schemas: JsValue,
    maps: JsValue,
    options: JsValue,
) -> Result<(SchemaRegistry, IdentifierMaps, RemapOptions), JsError> {
    let schemas: SchemaRegistry = serde_wasm_bindgen::from_value(schemas)?;
    let maps: IdentifierMaps = serde_wasm_bindgen::from_value(maps)?;
    let options: RemapOptions = if options.is_undefined() || options.is_null() {
        RemapOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };
    Ok((schemas, maps, options))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}
