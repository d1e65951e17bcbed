//! # mediahub-entity
//!
//! Domain models for the media folder hierarchy: the folder path codec and
//! the derived folder tree. Asset records themselves live in
//! `mediahub-core` because the store traits exchange them.

pub mod folder;

pub use folder::{DEFAULT_FOLDER, FolderNode, FolderPath};
pub use mediahub_core::types::{Asset, AssetId};
