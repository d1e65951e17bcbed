//! In-memory metadata store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::MetadataStore;
use mediahub_core::types::{Asset, AssetId, AssetUpdate, CreateAsset, FolderDeleteSummary};
use mediahub_entity::FolderPath;

/// Metadata store keeping every record in process memory.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    records: RwLock<Vec<Asset>>,
}

impl InMemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records.
    pub fn with_assets(assets: Vec<Asset>) -> Self {
        Self {
            records: RwLock::new(assets),
        }
    }
}

#[async_trait]
impl MetadataStore for InMemoryMetadataStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> AppResult<Vec<Asset>> {
        Ok(self.records.read().await.clone())
    }

    async fn create(&self, asset: &CreateAsset) -> AppResult<Asset> {
        let record = Asset {
            id: AssetId::generate(),
            url: asset.url.clone(),
            name: asset.name.clone(),
            folder: asset.folder.clone(),
        };
        self.records.write().await.push(record.clone());
        debug!(asset_id = %record.id, folder = %record.folder, "Asset record created");
        Ok(record)
    }

    async fn update(&self, id: &AssetId, update: &AssetUpdate) -> AppResult<Asset> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or_else(|| AppError::not_found(format!("Asset {id} not found")))?;
        update.apply(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: &AssetId) -> AppResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|a| &a.id != id);
        if records.len() == before {
            return Err(AppError::not_found(format!("Asset {id} not found")));
        }
        Ok(())
    }

    async fn delete_folder(&self, path: &str) -> AppResult<FolderDeleteSummary> {
        let prefix = FolderPath::navigation(path);
        if prefix.is_root() {
            return Err(AppError::validation("Refusing to delete the root folder"));
        }

        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|a| !FolderPath::of(a).starts_with(&prefix));
        let deleted_count = (before - records.len()) as u64;

        debug!(path, deleted_count, "Folder records deleted");
        Ok(FolderDeleteSummary {
            deleted_count,
            deleted_from_remote_count: 0,
        })
    }
}
