//! Rich-text walker: structural recursion over editor documents.
//!
//! Documents are untyped trees of `{type, attrs?, content?, marks?}` nodes.
//! Two shapes carry references: a `link` with `attrs.linktype == "story"`
//! (its `attrs.uuid` is remapped) and a `blok` node (its `attrs.body` holds
//! full component instances, which re-enter the component traverser).
//! Everything else is cloned while recursing into every value.
//!
//! Documents in the wild contain legacy and hand-edited fragments, so a
//! malformed special node never errors: a `blok` without `attrs.body` is
//! treated as having an empty body, anything else malformed is a no-op.

use serde_json::{Map, Value};

use super::Remapper;
use crate::error::RemapError;
use crate::pointer::{build_path, index_path};

const EMPTY_BODY: &[Value] = &[];

/// Tagged view of a rich-text value, so each shape is handled exhaustively.
#[derive(Debug)]
enum RichNode<'v> {
    Scalar(&'v Value),
    Array(&'v [Value]),
    /// A `link` node or mark pointing at a story. `uuid` is `None` when the
    /// node lacks `attrs.uuid`.
    StoryLink {
        node: &'v Map<String, Value>,
        uuid: Option<&'v Value>,
    },
    /// An embedded component container. A missing `attrs` or `attrs.body`
    /// reads as an empty body; `body` is `None` only when `attrs` or
    /// `attrs.body` is present with the wrong shape.
    Blok {
        node: &'v Map<String, Value>,
        body: Option<&'v [Value]>,
    },
    Node(&'v Map<String, Value>),
}

fn classify(value: &Value) -> RichNode<'_> {
    let node = match value {
        Value::Object(node) => node,
        Value::Array(items) => return RichNode::Array(items),
        scalar => return RichNode::Scalar(scalar),
    };

    let attrs = node.get("attrs").and_then(Value::as_object);
    match node.get("type").and_then(Value::as_str) {
        Some("link")
            if attrs
                .and_then(|a| a.get("linktype"))
                .and_then(Value::as_str)
                == Some("story") =>
        {
            RichNode::StoryLink {
                node,
                uuid: attrs.and_then(|a| a.get("uuid")),
            }
        }
        Some("blok") => RichNode::Blok {
            node,
            body: match node.get("attrs") {
                None | Some(Value::Null) => Some(EMPTY_BODY),
                Some(Value::Object(attrs)) => match attrs.get("body") {
                    None | Some(Value::Null) => Some(EMPTY_BODY),
                    Some(Value::Array(body)) => Some(body.as_slice()),
                    Some(_) => None,
                },
                Some(_) => None,
            },
        },
        _ => RichNode::Node(node),
    }
}

impl Remapper<'_> {
    /// Walk a rich-text value, rewriting story links and embedded components.
    pub(super) fn rich_node(
        &mut self,
        value: &Value,
        path: &str,
        depth: usize,
    ) -> Result<Value, RemapError> {
        self.check_depth(path, depth)?;

        match classify(value) {
            RichNode::Scalar(scalar) => Ok(scalar.clone()),
            RichNode::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    out.push(self.rich_node(item, &index_path(path, index), depth + 1)?);
                }
                Ok(Value::Array(out))
            }
            RichNode::StoryLink {
                node,
                uuid: Some(uuid),
            } => {
                let mut out = node.clone();
                if let Some(Value::Object(attrs)) = out.get_mut("attrs") {
                    attrs.insert("uuid".to_string(), self.maps.resolve_story(uuid));
                }
                Ok(Value::Object(out))
            }
            RichNode::StoryLink { node, uuid: None } => {
                tracing::trace!(path, "story link without uuid, leaving as-is");
                Ok(Value::Object(node.clone()))
            }
            RichNode::Blok {
                node,
                body: Some(body),
            } => {
                let body_path = build_path(path, &["attrs", "body"]);
                let mut mapped = Vec::with_capacity(body.len());
                for (index, instance) in body.iter().enumerate() {
                    mapped.push(self.component(
                        instance,
                        &index_path(&body_path, index),
                        depth + 1,
                    )?);
                }

                let mut out = node.clone();
                match out.get_mut("attrs") {
                    Some(Value::Object(attrs)) => {
                        attrs.insert("body".to_string(), Value::Array(mapped));
                    }
                    _ => {
                        let mut attrs = Map::new();
                        attrs.insert("body".to_string(), Value::Array(mapped));
                        out.insert("attrs".to_string(), Value::Object(attrs));
                    }
                }
                Ok(Value::Object(out))
            }
            RichNode::Blok { node, body: None } => {
                tracing::trace!(path, "blok node with malformed attrs, leaving as-is");
                Ok(Value::Object(node.clone()))
            }
            RichNode::Node(node) => {
                let mut out = Map::with_capacity(node.len());
                for (key, child) in node {
                    let child_path = build_path(path, &[key]);
                    out.insert(key.clone(), self.rich_node(child, &child_path, depth + 1)?);
                }
                Ok(Value::Object(out))
            }
        }
    }
}
