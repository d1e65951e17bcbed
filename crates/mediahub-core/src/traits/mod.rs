//! Collaborator traits defined in `mediahub-core` and implemented by `mediahub-store`.

pub mod asset_store;
pub mod metadata_store;

pub use asset_store::{AssetStore, ProgressFn};
pub use metadata_store::MetadataStore;
