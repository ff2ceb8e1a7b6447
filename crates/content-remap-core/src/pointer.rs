//! JSON Pointer construction for error and log locations.
//!
//! Every remap error carries the pointer of the offending value inside the
//! story (e.g. `#/content/body/0/images`), so callers can report exactly which
//! field broke the migration.

use std::borrow::Cow;

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer path by appending segments to a parent path.
///
/// # Example
/// ```
/// use content_remap_core::build_path;
/// assert_eq!(build_path("#", &["content", "a/b"]), "#/content/a~1b");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

/// Append an array index to a parent path.
pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}/{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_passthrough_borrows() {
        assert!(matches!(escape_pointer_segment("body"), Cow::Borrowed("body")));
    }

    #[test]
    fn test_escape_tilde_before_slash() {
        assert_eq!(escape_pointer_segment("a~/b"), "a~0~1b");
    }

    #[test]
    fn test_build_path_nested() {
        assert_eq!(
            build_path("#/content", &["title__i18n__de", "0"]),
            "#/content/title__i18n__de/0"
        );
        assert_eq!(index_path("#/content/body", 3), "#/content/body/3");
    }
}
