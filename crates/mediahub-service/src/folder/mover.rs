//! Bulk move of assets between folders.

use std::sync::Arc;

use tracing::{info, warn};

use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::MetadataStore;
use mediahub_core::types::{Asset, AssetId, AssetUpdate};
use mediahub_entity::FolderPath;

/// Result of a completed move.
#[derive(Debug, Clone)]
pub struct MoveReport {
    /// Destination folder.
    pub destination: FolderPath,
    /// Updated records, in request order.
    pub moved: Vec<Asset>,
}

/// Reassigns the folder attribute of a batch of assets.
#[derive(Debug, Clone)]
pub struct MoveCoordinator {
    /// Metadata store.
    metadata: Arc<dyn MetadataStore>,
}

impl MoveCoordinator {
    /// Creates a new move coordinator.
    pub fn new(metadata: Arc<dyn MetadataStore>) -> Self {
        Self { metadata }
    }

    /// Move `ids` to `destination`, one update at a time.
    ///
    /// The first failure stops the batch and is returned; assets updated
    /// before it stay moved. Moves are idempotent, so re-issuing the whole
    /// batch is safe.
    pub async fn move_assets(&self, ids: &[AssetId], destination: &str) -> AppResult<MoveReport> {
        let destination = FolderPath::navigation(destination);
        if destination.is_root() {
            return Err(AppError::validation("Move destination cannot be empty"));
        }
        let folder = destination.join();
        let total = ids.len();

        let mut moved = Vec::with_capacity(total);
        for (done, id) in ids.iter().enumerate() {
            let result = if id.is_valid() {
                self.metadata.update(id, &AssetUpdate::folder(&folder)).await
            } else {
                Err(AppError::validation("Asset has no stored id"))
            };

            match result {
                Ok(asset) => moved.push(asset),
                Err(e) => {
                    warn!(asset_id = %id, destination = %folder, error = %e, "Move failed");
                    return Err(AppError::with_source(
                        e.kind,
                        format!(
                            "Failed to move asset {id} to '{folder}' ({done} of {total} already moved): {}",
                            e.message
                        ),
                        e,
                    ));
                }
            }
        }

        info!(destination = %folder, count = total, "Assets moved");
        Ok(MoveReport { destination, moved })
    }
}
