//! Store manager: builds the configured metadata store and asset store.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use mediahub_core::config::{AssetStoreConfig, MetadataStoreConfig};
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::{AssetStore, MetadataStore};

use crate::providers::{CdnAssetStore, HttpMetadataStore, InMemoryMetadataStore, LocalAssetStore};

/// Holds the two collaborators every coordinator talks to.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// Metadata store for asset records.
    metadata: Arc<dyn MetadataStore>,
    /// Remote asset store for object bytes.
    assets: Arc<dyn AssetStore>,
}

impl StoreManager {
    /// Wrap already-built stores.
    pub fn new(metadata: Arc<dyn MetadataStore>, assets: Arc<dyn AssetStore>) -> Self {
        Self { metadata, assets }
    }

    /// Build both stores from configuration.
    pub async fn from_config(
        metadata: &MetadataStoreConfig,
        assets: &AssetStoreConfig,
    ) -> AppResult<Self> {
        let metadata_store: Arc<dyn MetadataStore> = match metadata.provider.as_str() {
            "memory" => Arc::new(InMemoryMetadataStore::new()),
            "http" => Arc::new(HttpMetadataStore::new(
                &metadata.base_url,
                Duration::from_secs(metadata.timeout_seconds),
            )?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown metadata provider '{other}'"
                )));
            }
        };

        let asset_store: Arc<dyn AssetStore> = match assets.provider.as_str() {
            "local" => Arc::new(
                LocalAssetStore::new(&assets.local.root_path, &assets.local.public_base_url)
                    .await?,
            ),
            "cdn" => Arc::new(CdnAssetStore::new(
                &assets.cdn.endpoint,
                &assets.cdn.api_key,
                Duration::from_secs(assets.timeout_seconds),
            )?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown asset provider '{other}'"
                )));
            }
        };

        info!(
            metadata = metadata_store.provider_type(),
            assets = asset_store.provider_type(),
            "Stores initialized"
        );

        Ok(Self::new(metadata_store, asset_store))
    }

    /// The metadata store.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        Arc::clone(&self.metadata)
    }

    /// The remote asset store.
    pub fn assets(&self) -> Arc<dyn AssetStore> {
        Arc::clone(&self.assets)
    }
}
