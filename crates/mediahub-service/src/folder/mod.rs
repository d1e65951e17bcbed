//! Folder tree, virtual overlay, and folder-level coordinators.

pub mod delete;
pub mod mover;
pub mod overlay;
pub mod tree;

pub use delete::{
    AssetDeletion, DeletionCoordinator, DeletionPhase, FolderDeletionOutcome,
    FolderDeletionReport, RemoteDeletion,
};
pub use mover::{MoveCoordinator, MoveReport};
pub use overlay::VirtualOverlay;
pub use tree::{build_tree, merge_overlay};
