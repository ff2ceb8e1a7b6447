//! Configuration for reference remapping.

use serde::{Deserialize, Serialize};

/// Options for a remap call.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `max-depth`).
/// This naming convention is part of the public API contract for the WASM
/// binding and config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct RemapOptions {
    /// Maximum nesting depth across component and rich-text recursion
    /// (stack overflow guard). Default: 256.
    pub max_depth: usize,
}

impl Default for RemapOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}
