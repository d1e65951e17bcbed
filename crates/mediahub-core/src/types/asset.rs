//! Asset records as exchanged with the metadata store.

use serde::{Deserialize, Serialize};

use super::id::AssetId;

/// One stored media object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Identifier assigned by the metadata store.
    #[serde(alias = "_id")]
    pub id: AssetId,
    /// Location at the remote asset store.
    pub url: String,
    /// Display name.
    pub name: String,
    /// `/`-delimited folder attribute; may be empty or missing.
    #[serde(default)]
    pub folder: String,
}

/// Data required to register a new asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAsset {
    /// Location at the remote asset store.
    pub url: String,
    /// Display name.
    pub name: String,
    /// Folder attribute.
    pub folder: String,
}

/// Partial update of an asset record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New folder attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

impl AssetUpdate {
    /// An update that only reassigns the folder.
    pub fn folder(folder: impl Into<String>) -> Self {
        Self {
            name: None,
            folder: Some(folder.into()),
        }
    }

    /// Apply this update to an asset in place.
    pub fn apply(&self, asset: &mut Asset) {
        if let Some(name) = &self.name {
            asset.name = name.clone();
        }
        if let Some(folder) = &self.folder {
            asset.folder = folder.clone();
        }
    }
}

/// Result of a folder-wide delete at the metadata store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDeleteSummary {
    /// Number of metadata records removed.
    pub deleted_count: u64,
    /// Number of remote objects the store removed on its side.
    pub deleted_from_remote_count: u64,
}
