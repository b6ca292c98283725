//! Category trees and their flattened leaf view.
//!
//! The upstream API returns categories as a nested tree of arbitrary depth.
//! Callers only ever assign products to leaf categories, so the gateway
//! exposes a flat list of leaves, each annotated with the slash-joined path of
//! its ancestors under a synthetic `root` segment:
//!
//! ```text
//! Clothing                      root/Clothing/Shirts
//! ├── Shirts            ==>     root/Clothing/Shoes/Boots
//! └── Shoes                     root/Gift cards
//!     └── Boots
//! Gift cards
//! ```

use serde::{Deserialize, Serialize};

use super::lenient;

/// First segment of every flattened category path.
pub const ROOT_SEGMENT: &str = "root";

/// A node of the upstream category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// Upstream category identifier.
    #[serde(deserialize_with = "lenient::string_or_number")]
    pub id: String,
    /// Display name, used as the path segment.
    pub name: String,
    /// Child categories; `null`, missing and `[]` all mean "leaf".
    #[serde(default)]
    pub children: Option<Vec<CategoryNode>>,
}

impl CategoryNode {
    /// Create a leaf node.
    #[must_use]
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: None,
        }
    }

    /// Create a node with the given children.
    #[must_use]
    pub fn branch(
        id: impl Into<String>,
        name: impl Into<String>,
        children: Vec<Self>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Some(children),
        }
    }

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.as_ref().is_none_or(Vec::is_empty)
    }
}

impl Drop for CategoryNode {
    // Unlinks descendants onto a heap stack so dropping a deep tree does not
    // recurse once per level.
    fn drop(&mut self) {
        let Some(mut pending) = self.children.take() else {
            return;
        };
        while let Some(mut node) = pending.pop() {
            if let Some(children) = node.children.take() {
                pending.extend(children);
            }
        }
    }
}

/// A leaf category with its computed hierarchical path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatCategory {
    /// Leaf display name.
    pub name: String,
    /// `root/<ancestor>/.../<name>`.
    pub path: String,
    /// Upstream id of the leaf.
    pub source_id: String,
}

/// Flatten a category tree into its leaves, in pre-order.
///
/// Every leaf is emitted exactly once, in the order a depth-first walk of the
/// upstream arrays encounters it. Branch nodes contribute their name to the
/// path of their descendants but are never emitted themselves. Duplicates in
/// the input are preserved.
///
/// The walk uses an explicit stack, so tree depth is bounded by memory rather
/// than by the call stack.
#[must_use]
pub fn flatten(tree: &[CategoryNode]) -> Vec<FlatCategory> {
    let mut leaves = Vec::new();
    let mut stack: Vec<(&CategoryNode, String)> = tree
        .iter()
        .rev()
        .map(|node| (node, ROOT_SEGMENT.to_owned()))
        .collect();

    while let Some((node, parent_path)) = stack.pop() {
        let path = format!("{parent_path}/{}", node.name);

        match node.children.as_deref() {
            Some(children) if !children.is_empty() => {
                // Reversed so the first child is popped first
                stack.extend(children.iter().rev().map(|child| (child, path.clone())));
            }
            _ => leaves.push(FlatCategory {
                name: node.name.clone(),
                path,
                source_id: node.id.clone(),
            }),
        }
    }

    leaves
}
