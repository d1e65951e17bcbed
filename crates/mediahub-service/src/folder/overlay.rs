//! Virtual folders: paths the user created that have no assets yet.

use std::collections::BTreeSet;

use mediahub_entity::{FolderNode, FolderPath};

/// Set of folder paths kept only in client memory.
///
/// Entries are added when a user creates an empty folder and removed when
/// the folder gains a first asset or is deleted. The overlay never promotes
/// or demotes entries by itself; the owner calls [`VirtualOverlay::drop_backed`]
/// and [`VirtualOverlay::retire`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualOverlay {
    paths: BTreeSet<FolderPath>,
}

impl VirtualOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path. The root is never stored. Returns `true` if newly added.
    pub fn add(&mut self, path: FolderPath) -> bool {
        if path.is_root() {
            return false;
        }
        self.paths.insert(path)
    }

    /// Remove exactly `path`. Returns `true` if it was present.
    pub fn remove(&mut self, path: &FolderPath) -> bool {
        self.paths.remove(path)
    }

    /// Remove `path` and every path beneath it. Returns the number removed.
    pub fn retire(&mut self, path: &FolderPath) -> usize {
        let before = self.paths.len();
        self.paths.retain(|p| !p.starts_with(path));
        before - self.paths.len()
    }

    /// Remove entries that now resolve to a backed node in `asset_tree`.
    ///
    /// `asset_tree` must be built from assets only, without this overlay.
    pub fn drop_backed(&mut self, asset_tree: &FolderNode) -> Vec<FolderPath> {
        let promoted: Vec<FolderPath> = self
            .paths
            .iter()
            .filter(|p| asset_tree.get(p).is_some_and(FolderNode::is_backed))
            .cloned()
            .collect();
        for path in &promoted {
            self.paths.remove(path);
        }
        promoted
    }

    /// Whether `path` is in the overlay.
    pub fn contains(&self, path: &FolderPath) -> bool {
        self.paths.contains(path)
    }

    /// Iterate over the stored paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &FolderPath> {
        self.paths.iter()
    }

    /// Number of stored paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the overlay is empty.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
