//! Cascading folder deletion across the asset store and the metadata store.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use mediahub_core::config::RetirementPolicy;
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::{AssetStore, MetadataStore};
use mediahub_core::types::{Asset, AssetId, FolderDeleteSummary};
use mediahub_entity::{FolderNode, FolderPath};
use mediahub_store::object_id_from_url;

use super::overlay::VirtualOverlay;

/// Progress of a folder deletion, published while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DeletionPhase {
    /// Request accepted.
    Requested,
    /// Gathering the assets under the folder.
    Collecting,
    /// Deleting assets one at a time; `done` of `total` finished.
    Deleting {
        /// Assets finished so far.
        done: usize,
        /// Assets collected.
        total: usize,
    },
    /// Retiring the folder itself.
    Finalizing,
    /// Folder retired.
    Done,
    /// Folder kept.
    Failed,
}

impl fmt::Display for DeletionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => write!(f, "requested"),
            Self::Collecting => write!(f, "collecting"),
            Self::Deleting { done, total } => write!(f, "deleting {done}/{total}"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// What happened to the remote copy of one asset.
#[derive(Debug, Clone)]
pub enum RemoteDeletion {
    /// The asset store removed the object.
    Deleted,
    /// The asset store answered but did not remove anything.
    NotFound,
    /// The request to the asset store failed.
    Failed(AppError),
    /// No object id could be derived from the URL.
    Skipped,
}

/// Per-asset result of a folder deletion.
#[derive(Debug, Clone)]
pub struct AssetDeletion {
    /// Asset identifier.
    pub asset_id: AssetId,
    /// Asset display name.
    pub name: String,
    /// Remote copy outcome (advisory).
    pub remote: RemoteDeletion,
    /// Metadata record outcome.
    pub metadata: Result<(), AppError>,
}

impl AssetDeletion {
    /// Whether the metadata record is gone. Remote failures do not count.
    pub fn is_deleted(&self) -> bool {
        self.metadata.is_ok()
    }
}

/// Terminal state of a folder deletion.
#[derive(Debug, Clone)]
pub enum FolderDeletionOutcome {
    /// Every deletion confirmed and the folder retired. `summary` is `None`
    /// when the folder had no assets and only the overlay entry was dropped.
    Retired {
        /// Metadata store answer to the folder-wide delete.
        summary: Option<FolderDeleteSummary>,
    },
    /// Errors occurred; the folder was retired anyway (optimistic policy).
    RetiredWithErrors {
        /// What went wrong.
        error: AppError,
    },
    /// Errors occurred; the folder stays with its remaining assets (strict policy).
    Kept {
        /// What went wrong.
        error: AppError,
    },
}

/// Full account of one folder deletion.
#[derive(Debug, Clone)]
pub struct FolderDeletionReport {
    /// Folder that was targeted.
    pub path: FolderPath,
    /// Policy the deletion ran under.
    pub policy: RetirementPolicy,
    /// Per-asset results, in deletion order.
    pub items: Vec<AssetDeletion>,
    /// Terminal state.
    pub outcome: FolderDeletionOutcome,
}

impl FolderDeletionReport {
    /// Whether the folder is gone from view.
    pub fn is_retired(&self) -> bool {
        !matches!(self.outcome, FolderDeletionOutcome::Kept { .. })
    }

    /// Assets whose metadata record could not be deleted.
    pub fn failures(&self) -> impl Iterator<Item = &AssetDeletion> {
        self.items.iter().filter(|item| !item.is_deleted())
    }

    /// Where browsing should continue: the parent if retired, else the folder.
    pub fn navigate_to(&self) -> FolderPath {
        if self.is_retired() {
            self.path.parent()
        } else {
            self.path.clone()
        }
    }
}

/// Deletes every asset under a folder, then retires the folder.
///
/// Assets are deleted strictly one after another; asset `i` is fully
/// processed before asset `i + 1` starts.
#[derive(Debug)]
pub struct DeletionCoordinator {
    /// Metadata store.
    metadata: Arc<dyn MetadataStore>,
    /// Remote asset store.
    assets: Arc<dyn AssetStore>,
    /// Phase broadcast.
    phase: watch::Sender<DeletionPhase>,
}

impl DeletionCoordinator {
    /// Creates a new deletion coordinator.
    pub fn new(metadata: Arc<dyn MetadataStore>, assets: Arc<dyn AssetStore>) -> Self {
        let (phase, _) = watch::channel(DeletionPhase::Requested);
        Self {
            metadata,
            assets,
            phase,
        }
    }

    /// Observe the phase of the deletion in progress.
    pub fn subscribe(&self) -> watch::Receiver<DeletionPhase> {
        self.phase.subscribe()
    }

    fn publish(&self, phase: DeletionPhase) {
        debug!(%phase, "Folder deletion phase");
        self.phase.send_replace(phase);
    }

    /// Delete the folder at `path` as seen in `tree` (the merged view).
    ///
    /// Per-asset failures are recorded in the report; the only error
    /// returned is an attempt to delete the root.
    pub async fn delete_folder(
        &self,
        tree: &FolderNode,
        overlay: &mut VirtualOverlay,
        path: &FolderPath,
        policy: RetirementPolicy,
    ) -> AppResult<FolderDeletionReport> {
        if path.is_root() {
            return Err(AppError::validation("The root folder cannot be deleted"));
        }

        self.publish(DeletionPhase::Requested);
        info!(path = %path, %policy, "Folder deletion requested");

        self.publish(DeletionPhase::Collecting);
        let targets: Vec<Asset> = tree
            .resolve(path)
            .collect_assets()
            .into_iter()
            .cloned()
            .collect();
        let total = targets.len();

        let mut items = Vec::with_capacity(total);
        for (done, asset) in targets.iter().enumerate() {
            self.publish(DeletionPhase::Deleting { done, total });
            items.push(self.delete_asset(asset).await);
        }
        if total > 0 {
            self.publish(DeletionPhase::Deleting { done: total, total });
        }

        self.publish(DeletionPhase::Finalizing);
        let failed = items.iter().filter(|item| !item.is_deleted()).count();
        let outcome = if total == 0 {
            overlay.retire(path);
            FolderDeletionOutcome::Retired { summary: None }
        } else {
            self.finalize(overlay, path, policy, failed, total).await
        };

        match &outcome {
            FolderDeletionOutcome::Retired { .. } => {
                self.publish(DeletionPhase::Done);
                info!(path = %path, deleted = total, "Folder deleted");
            }
            FolderDeletionOutcome::RetiredWithErrors { error } => {
                self.publish(DeletionPhase::Done);
                warn!(path = %path, error = %error, "Folder retired despite errors");
            }
            FolderDeletionOutcome::Kept { error } => {
                self.publish(DeletionPhase::Failed);
                warn!(path = %path, error = %error, "Folder kept");
            }
        }

        Ok(FolderDeletionReport {
            path: path.clone(),
            policy,
            items,
            outcome,
        })
    }

    /// Retire a folder that had real assets.
    async fn finalize(
        &self,
        overlay: &mut VirtualOverlay,
        path: &FolderPath,
        policy: RetirementPolicy,
        failed: usize,
        total: usize,
    ) -> FolderDeletionOutcome {
        let item_error = (failed > 0).then(|| {
            AppError::external(format!("{failed} of {total} assets could not be deleted"))
        });

        if let (Some(error), RetirementPolicy::Strict) = (&item_error, policy) {
            return FolderDeletionOutcome::Kept {
                error: error.clone(),
            };
        }

        match self.metadata.delete_folder(&path.join()).await {
            Ok(summary) => {
                overlay.retire(path);
                match item_error {
                    Some(error) => FolderDeletionOutcome::RetiredWithErrors { error },
                    None => FolderDeletionOutcome::Retired {
                        summary: Some(summary),
                    },
                }
            }
            Err(error) => match policy {
                RetirementPolicy::Optimistic => {
                    overlay.retire(path);
                    FolderDeletionOutcome::RetiredWithErrors {
                        error: error.for_item(path),
                    }
                }
                RetirementPolicy::Strict => FolderDeletionOutcome::Kept {
                    error: error.for_item(path),
                },
            },
        }
    }

    /// Delete one asset: remote copy first (advisory), then the metadata record.
    async fn delete_asset(&self, asset: &Asset) -> AssetDeletion {
        let remote = match object_id_from_url(&asset.url) {
            Some(object_id) => match self.assets.delete_by_object_id(&object_id).await {
                Ok(true) => RemoteDeletion::Deleted,
                Ok(false) => RemoteDeletion::NotFound,
                Err(e) => {
                    warn!(asset_id = %asset.id, object_id = %object_id, error = %e, "Remote delete failed");
                    RemoteDeletion::Failed(e)
                }
            },
            None => {
                debug!(asset_id = %asset.id, url = %asset.url, "No object id; remote delete skipped");
                RemoteDeletion::Skipped
            }
        };

        let metadata = if asset.id.is_valid() {
            self.metadata.delete(&asset.id).await
        } else {
            Err(AppError::validation("Asset has no stored id"))
        };
        let metadata = metadata.map_err(|e| {
            warn!(asset_id = %asset.id, error = %e, "Metadata delete failed");
            e.for_item(format!("asset {}", asset.id))
        });

        AssetDeletion {
            asset_id: asset.id.clone(),
            name: asset.name.clone(),
            remote,
            metadata,
        }
    }
}
