//! Metadata store trait for asset records.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Asset, AssetId, AssetUpdate, CreateAsset, FolderDeleteSummary};

/// The store holding one record per asset (id, url, name, folder).
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "memory", "http").
    fn provider_type(&self) -> &str;

    /// List every asset record.
    async fn list(&self) -> AppResult<Vec<Asset>>;

    /// Register a new asset record and return it with its assigned id.
    async fn create(&self, asset: &CreateAsset) -> AppResult<Asset>;

    /// Apply a partial update and return the updated record.
    async fn update(&self, id: &AssetId, update: &AssetUpdate) -> AppResult<Asset>;

    /// Delete a record by id.
    async fn delete(&self, id: &AssetId) -> AppResult<()>;

    /// Delete every record whose folder is `path` or lies beneath it.
    async fn delete_folder(&self, path: &str) -> AppResult<FolderDeleteSummary>;
}
