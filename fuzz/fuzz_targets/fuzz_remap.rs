#![no_main]

use content_remap_core::{remap_story, IdentifierMaps, RemapOptions, SchemaRegistry};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

// Accepts arbitrary bytes, attempts to parse as JSON, feeds to remap_story().
// Goal: no panics, even on malformed content.
fuzz_target!(|data: &[u8]| {
    if let Ok(story) = serde_json::from_slice::<serde_json::Value>(data) {
        let schemas: SchemaRegistry = serde_json::from_value(json!({
            "page": {
                "body": { "type": "bloks" },
                "text": { "type": "richtext" },
                "image": { "type": "asset" },
                "images": { "type": "multiasset" },
                "link": { "type": "multilink" },
                "refs": { "type": "options", "source": "internal_stories" }
            }
        }))
        .unwrap();
        let maps = IdentifierMaps::new().with_story(1u64, 2u64).with_story("a", "b");
        let _ = remap_story(&story, &schemas, &maps, &RemapOptions::default());
    }
});
