//! Folder tree structures for hierarchical browsing.
//!
//! The tree is a derived view rebuilt from the flat asset list; no node
//! identity survives a rebuild.

use std::collections::BTreeMap;

use serde::Serialize;

use mediahub_core::types::Asset;

use super::path::FolderPath;

/// Returned by [`FolderNode::resolve`] for paths that do not exist.
static EMPTY_NODE: FolderNode = FolderNode::new();

/// A node in the folder tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FolderNode {
    /// Child folders keyed by segment name.
    pub children: BTreeMap<String, FolderNode>,
    /// Assets whose folder resolves exactly to this node.
    pub items: Vec<Asset>,
}

impl FolderNode {
    /// Create an empty node.
    pub const fn new() -> Self {
        Self {
            children: BTreeMap::new(),
            items: Vec::new(),
        }
    }

    /// Direct child by name.
    pub fn child(&self, name: &str) -> Option<&FolderNode> {
        self.children.get(name)
    }

    /// Walk `path` from this node, creating missing children on the way.
    pub fn ensure_path(&mut self, path: &FolderPath) -> &mut FolderNode {
        let mut node = self;
        for segment in path.segments() {
            node = node.children.entry(segment.clone()).or_default();
        }
        node
    }

    /// Look up a node without falling back.
    pub fn get(&self, path: &FolderPath) -> Option<&FolderNode> {
        let mut node = self;
        for segment in path.segments() {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    /// Resolve `path` to a node.
    ///
    /// Unknown paths resolve to an empty node, so browsing a folder that was
    /// deleted in the meantime shows nothing instead of failing.
    pub fn resolve(&self, path: &FolderPath) -> &FolderNode {
        self.get(path).unwrap_or(&EMPTY_NODE)
    }

    /// Every asset in this subtree: own items first, then each child
    /// depth-first in key order.
    pub fn collect_assets(&self) -> Vec<&Asset> {
        let mut out = Vec::with_capacity(self.items.len());
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a Asset>) {
        out.extend(self.items.iter());
        for child in self.children.values() {
            child.collect_into(out);
        }
    }

    /// Children sorted for display: case-insensitive, ties broken by exact name.
    pub fn sorted_children(&self) -> Vec<(&str, &FolderNode)> {
        let mut children: Vec<(&str, &FolderNode)> = self
            .children
            .iter()
            .map(|(name, node)| (name.as_str(), node))
            .collect();
        children.sort_by(|(a, _), (b, _)| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        children
    }

    /// Number of assets directly in this node.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of assets in this subtree.
    pub fn total_item_count(&self) -> usize {
        self.items.len()
            + self
                .children
                .values()
                .map(FolderNode::total_item_count)
                .sum::<usize>()
    }

    /// Whether at least one real asset lives somewhere in this subtree.
    pub fn is_backed(&self) -> bool {
        !self.items.is_empty() || self.children.values().any(FolderNode::is_backed)
    }

    /// Whether the node has neither items nor children.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.children.is_empty()
    }
}
