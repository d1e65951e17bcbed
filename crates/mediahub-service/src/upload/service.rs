//! Upload coordinator: per-file validation, bounded concurrent transfers
//! and metadata registration.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{Semaphore, watch};
use tracing::{info, warn};

use mediahub_core::config::UploadConfig;
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::{AssetStore, MetadataStore};
use mediahub_core::types::{Asset, CreateAsset, UploadFile};
use mediahub_entity::FolderPath;

use super::progress::ProgressAggregator;

/// Result for one file of a batch.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// File name as submitted.
    pub file_name: String,
    /// File size in bytes.
    pub size: u64,
    /// Registered asset, or why the file did not make it.
    pub result: Result<Asset, AppError>,
    /// Set when validation turned the file away and nothing was sent.
    pub rejected: bool,
}

impl UploadOutcome {
    /// Whether the file was rejected before any transfer started.
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }
}

/// Per-file results of an upload batch, in submission order.
#[derive(Debug, Clone)]
pub struct UploadReport {
    /// Destination folder.
    pub folder: FolderPath,
    /// One outcome per submitted file.
    pub outcomes: Vec<UploadOutcome>,
    /// Number of files that were handed to the asset store.
    pub transferred: usize,
}

impl UploadReport {
    /// Assets registered by this batch.
    pub fn uploaded(&self) -> impl Iterator<Item = &Asset> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Files that did not make it, with the reason.
    pub fn failed(&self) -> impl Iterator<Item = (&str, &AppError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file_name.as_str(), e)))
    }

    /// Whether every file was uploaded.
    pub fn is_complete_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Uploads a batch of files concurrently and registers each one.
#[derive(Debug, Clone)]
pub struct UploadCoordinator {
    /// Metadata store.
    metadata: Arc<dyn MetadataStore>,
    /// Remote asset store.
    assets: Arc<dyn AssetStore>,
    /// Upload configuration.
    config: UploadConfig,
}

impl UploadCoordinator {
    /// Creates a new upload coordinator.
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        assets: Arc<dyn AssetStore>,
        config: UploadConfig,
    ) -> Self {
        Self {
            metadata,
            assets,
            config,
        }
    }

    /// Check a file before any network call.
    pub fn validate(&self, file: &UploadFile) -> AppResult<()> {
        if file.name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if file.size() > self.config.max_file_size_bytes {
            return Err(AppError::validation(format!(
                "File is {} bytes, exceeding the maximum upload size of {} bytes",
                file.size(),
                self.config.max_file_size_bytes
            )));
        }
        Ok(())
    }

    /// Upload `files` into `folder`.
    ///
    /// Invalid files are rejected individually; the rest are transferred
    /// concurrently, at most `max_concurrency` at a time. The aggregate
    /// percentage is published on `progress`. Resolves once every file is
    /// terminal and never fails as a whole.
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        folder: &FolderPath,
        progress: watch::Sender<u8>,
    ) -> UploadReport {
        let folder_attr = folder.join();
        let mut outcomes: Vec<Option<UploadOutcome>> = Vec::with_capacity(files.len());
        let mut valid: Vec<(usize, UploadFile)> = Vec::new();

        for (index, file) in files.into_iter().enumerate() {
            match self.validate(&file) {
                Ok(()) => {
                    outcomes.push(None);
                    valid.push((index, file));
                }
                Err(e) => {
                    warn!(file = %file.name, error = %e, "Upload rejected");
                    outcomes.push(Some(UploadOutcome {
                        file_name: file.name.clone(),
                        size: file.size(),
                        result: Err(e.for_item(&file.name)),
                        rejected: true,
                    }));
                }
            }
        }

        let transferred = valid.len();
        let aggregator = ProgressAggregator::new(transferred, progress);
        let limiter = (self.config.max_concurrency > 0)
            .then(|| Semaphore::new(self.config.max_concurrency));

        info!(
            folder = %folder_attr,
            files = outcomes.len(),
            transfers = transferred,
            max_concurrency = self.config.max_concurrency,
            "Upload batch started"
        );

        let tasks = valid.into_iter().enumerate().map(|(slot, (index, file))| {
            let aggregator = &aggregator;
            let limiter = limiter.as_ref();
            let folder_attr = folder_attr.as_str();
            async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire().await.ok(),
                    None => None,
                };
                let result = self.transfer(&file, folder_attr, slot, aggregator).await;
                aggregator.complete(slot);
                (
                    index,
                    UploadOutcome {
                        file_name: file.name.clone(),
                        size: file.size(),
                        result: result.map_err(|e| e.for_item(&file.name)),
                        rejected: false,
                    },
                )
            }
        });

        for (index, outcome) in join_all(tasks).await {
            outcomes[index] = Some(outcome);
        }

        let outcomes: Vec<UploadOutcome> = outcomes.into_iter().flatten().collect();
        let succeeded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!(
            folder = %folder_attr,
            succeeded,
            failed = outcomes.len() - succeeded,
            "Upload batch finished"
        );

        UploadReport {
            folder: folder.clone(),
            outcomes,
            transferred,
        }
    }

    /// Transfer one file and register its metadata record.
    async fn transfer(
        &self,
        file: &UploadFile,
        folder: &str,
        slot: usize,
        aggregator: &ProgressAggregator,
    ) -> AppResult<Asset> {
        let stored = self
            .assets
            .upload(file, folder, &|fraction: f64| aggregator.report(slot, fraction))
            .await?;

        let asset = self
            .metadata
            .create(&CreateAsset {
                url: stored.url,
                name: file.name.clone(),
                folder: folder.to_string(),
            })
            .await?;

        info!(asset_id = %asset.id, file = %file.name, folder, "Upload registered");
        Ok(asset)
    }
}
