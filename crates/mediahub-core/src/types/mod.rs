//! Shared types exchanged with the metadata store and the asset store.

pub mod asset;
pub mod id;
pub mod upload;

pub use asset::{Asset, AssetUpdate, CreateAsset, FolderDeleteSummary};
pub use id::AssetId;
pub use upload::{StoredObject, UploadFile};
