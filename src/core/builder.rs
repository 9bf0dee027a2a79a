//! Tree construction: walk a [`Document`] and populate a [`JsonTree`].
//!
//! One depth-first pass, called once per load.  There is no cycle detection
//! and no size or depth cap: documents are trees by construction, and a huge
//! document simply produces a proportionally large arena.

use super::document::{Document, ValueKind};
use super::tree::{font_size_for, JsonTree, NodeIcon, NodeId};

/// Build a fully expanded tree for `doc`.
pub fn build_tree(doc: &Document) -> JsonTree {
    let mut tree = JsonTree::new();
    let root = tree.root;
    append_value(&mut tree, root, doc, 0);
    tree.expand_all();
    tracing::debug!("build_tree: {} rows", tree.nodes.len() - 1);
    tree
}

/// Icon for a key row, chosen by the kind of value it holds.
fn key_icon(value: &Document) -> NodeIcon {
    match value.kind() {
        ValueKind::Object => NodeIcon::Object,
        ValueKind::Array => NodeIcon::Array,
        ValueKind::Scalar => NodeIcon::Key,
    }
}

/// Recursively append rows for `value` under `parent_id`.
///
/// `depth` only drives font size.  It advances by one per object level and by
/// two when passing through a group (the group row and its key rows).
pub fn append_value(tree: &mut JsonTree, parent_id: NodeId, value: &Document, depth: usize) {
    match value {
        Document::Object(entries) => {
            append_entries(tree, parent_id, entries, depth, 0);
        }
        Document::Array(items) => {
            for item in items {
                match item {
                    Document::Object(entries) => {
                        let group = tree.add_child(
                            parent_id,
                            String::new(),
                            NodeIcon::Object,
                            font_size_for(depth, 0),
                        );
                        tree.get_mut(group).is_group = true;
                        append_entries(tree, group, entries, depth, 1);
                    }
                    other => {
                        append_leaf(tree, parent_id, other, depth);
                    }
                }
            }
        }
        Document::Scalar(_) => {
            append_leaf(tree, parent_id, value, depth);
        }
    }
}

/// Key rows for an object's entries, each followed by its value's subtree.
fn append_entries(
    tree: &mut JsonTree,
    parent_id: NodeId,
    entries: &[(String, Document)],
    depth: usize,
    offset: usize,
) {
    for (key, value) in entries {
        let key_id = tree.add_child(
            parent_id,
            key.clone(),
            key_icon(value),
            font_size_for(depth, offset),
        );
        append_value(tree, key_id, value, depth + offset + 1);
    }
}

fn append_leaf(tree: &mut JsonTree, parent_id: NodeId, value: &Document, depth: usize) -> NodeId {
    tree.add_child(
        parent_id,
        value.display_text(),
        NodeIcon::Leaf,
        font_size_for(depth, 1),
    )
}

/// Render the tree as indented text, one row per line.
pub fn dump(tree: &JsonTree) -> String {
    let mut out = String::new();
    for id in tree.attached_nodes() {
        let node = tree.get(id);
        let indent = "  ".repeat(node.depth - 1);
        let icon = match node.icon {
            NodeIcon::Object => "{}",
            NodeIcon::Array => "[]",
            NodeIcon::Key => "≡",
            NodeIcon::Leaf => "-",
        };
        out.push_str(&format!("{indent}{icon} {}\n", node.label));
    }
    out
}
