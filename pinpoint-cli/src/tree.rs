//! JSON document trees.
//!
//! A document is a single element object:
//!
//! ```json
//! {"tag": "html", "attrs": {"lang": "en"}, "children": [
//!     {"tag": "body", "children": ["some text", {"tag": "div", "attrs": {"id": "main"}}]}
//! ]}
//! ```
//!
//! Text nodes are plain strings. `attrs` and `children` may be omitted.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use pinpoint_dom::{DocumentMode, DomTree, ElementData, NodeId};
use serde::Deserialize;

/// One node of the JSON tree format.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum JsonNode {
    /// A text node.
    Text(String),
    /// An element with its attributes and children.
    Element {
        /// Tag name as written.
        tag: String,
        /// Attributes, in name order.
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        /// Child nodes in document order.
        #[serde(default)]
        children: Vec<JsonNode>,
    },
}

/// Parse a JSON document and build a [`DomTree`] in the given mode.
pub fn load_tree(json: &str, mode: DocumentMode) -> Result<DomTree> {
    let root: JsonNode = serde_json::from_str(json).context("invalid JSON document tree")?;
    if matches!(root, JsonNode::Text(_)) {
        bail!("the document element must be an element, not text");
    }

    let mut tree = DomTree::with_mode(mode);
    append(&mut tree, NodeId::ROOT, root);
    Ok(tree)
}

fn append(tree: &mut DomTree, parent: NodeId, node: JsonNode) {
    match node {
        JsonNode::Text(text) => {
            let _ = tree.append_text(parent, text);
        }
        JsonNode::Element {
            tag,
            attrs,
            children,
        } => {
            let element = attrs
                .into_iter()
                .fold(ElementData::new(tag), |element, (name, value)| {
                    element.with_attr(name, value)
                });
            let id = tree.append_element(parent, element);
            for child in children {
                append(tree, id, child);
            }
        }
    }
}

/// Resolve a `/`-separated path of element-child indices.
///
/// The path starts at the document element, so `""` is the document element
/// itself and `"1/0"` is the first element child of its second element child.
pub fn resolve_path(tree: &DomTree, path: &str) -> Result<NodeId> {
    let mut current = tree
        .document_element()
        .context("the document has no document element")?;

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let index: usize = segment
            .parse()
            .with_context(|| format!("path segment '{segment}' is not an index"))?;
        current = tree
            .element_children(current)
            .nth(index)
            .with_context(|| format!("no element child at index {index} in path '{path}'"))?;
    }
    Ok(current)
}
