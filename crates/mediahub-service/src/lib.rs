//! # mediahub-service
//!
//! The media folder engine. Rebuilds the folder tree from the flat asset
//! list, overlays client-side virtual folders, and coordinates the
//! operations that span the metadata store and the remote asset store:
//! cascading folder deletion, bulk moves, and concurrent uploads with an
//! aggregate progress value.
//!
//! Coordinators receive every piece of context they need (tree snapshot,
//! overlay, target path) as parameters and return reports; the
//! [`MediaLibrary`] is the caller that owns that state.

pub mod folder;
pub mod library;
pub mod upload;

pub use folder::{
    AssetDeletion, DeletionCoordinator, DeletionPhase, FolderDeletionOutcome,
    FolderDeletionReport, MoveCoordinator, MoveReport, RemoteDeletion, VirtualOverlay,
    build_tree, merge_overlay,
};
pub use library::{MediaLibrary, UploadTarget};
pub use mediahub_core::config::RetirementPolicy;
pub use upload::{ProgressAggregator, UploadCoordinator, UploadOutcome, UploadReport};
