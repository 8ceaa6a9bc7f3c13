//! Navigation tree nodes.

use serde::Serialize;
use sitenav_store::AssetId;

/// Decorated node of a navigation tree.
///
/// Created from one site plan row and the attributes of the content item it
/// places. Children are in ascending rank order and sit exactly one level
/// below their parent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationNode {
    /// Identity of the underlying content item.
    pub id: AssetId,
    /// Reference to the underlying content item.
    ///
    /// Nodes without a page reference are never attached to a parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<AssetId>,
    /// Hops from the queried root (root = 0).
    pub level: u32,
    /// Subtype of the content item, empty when it has none.
    pub subtype: String,
    /// Display name, empty when the item has no name.
    pub pagename: String,
    /// Resolved navigable address. Never an empty string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Link label, falling back to `pagename`.
    pub linktext: String,
    /// Child nodes in rank order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationNode>,
}

impl NavigationNode {
    /// True if the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over this node and all its descendants in pre-order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including this node.
    #[must_use]
    pub fn count(&self) -> usize {
        self.descendants().count()
    }

    /// Deepest level present in this subtree.
    #[must_use]
    pub fn max_level(&self) -> u32 {
        self.descendants()
            .map(|node| node.level)
            .max()
            .unwrap_or(self.level)
    }
}

/// Pre-order iterator over a navigation subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a NavigationNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a NavigationNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
