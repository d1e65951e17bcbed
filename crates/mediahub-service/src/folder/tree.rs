//! Folder tree building from the flat asset list.

use mediahub_core::types::Asset;
use mediahub_entity::{FolderNode, FolderPath};

use super::overlay::VirtualOverlay;

/// Fold a flat asset list into a folder tree.
///
/// Each asset lands in the node its folder attribute resolves to; missing
/// intermediate nodes are created empty. Items keep input order within a
/// node, so callers wanting reproducible grids should pass a stably sorted
/// list.
pub fn build_tree(assets: &[Asset]) -> FolderNode {
    let mut root = FolderNode::new();
    for asset in assets {
        root.ensure_path(&FolderPath::of(asset))
            .items
            .push(asset.clone());
    }
    root
}

/// Create a node for every overlay path that is not already present.
///
/// Existing nodes and their items are left untouched.
pub fn merge_overlay(mut tree: FolderNode, overlay: &VirtualOverlay) -> FolderNode {
    for path in overlay.paths() {
        tree.ensure_path(path);
    }
    tree
}
