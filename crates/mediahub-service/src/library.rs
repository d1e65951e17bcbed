//! Media library: the stateful caller around the coordinators.
//!
//! Owns the asset snapshot, the virtual overlay, the navigation path and
//! the selection. Every coordinator call receives this context explicitly
//! and the library applies the result afterwards (refresh, overlay
//! promotion, navigating up after a delete, clearing the selection).

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use mediahub_core::config::{AppConfig, RetirementPolicy};
use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::MetadataStore;
use mediahub_core::types::{Asset, AssetId, UploadFile};
use mediahub_entity::{FolderNode, FolderPath};
use mediahub_store::StoreManager;

use crate::folder::{
    DeletionCoordinator, DeletionPhase, FolderDeletionReport, MoveCoordinator, MoveReport,
    VirtualOverlay, build_tree, merge_overlay,
};
use crate::upload::{UploadCoordinator, UploadReport};

/// Where an upload batch should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadTarget {
    /// The folder currently browsed.
    Current,
    /// An explicit navigation path.
    Folder(FolderPath),
    /// A raw folder attribute supplied by the caller, e.g. one tied to a
    /// product. Parsed like a stored attribute, so `""` means `default`.
    Override(String),
}

impl UploadTarget {
    /// Resolve against the current navigation path.
    ///
    /// Assets cannot live at the root, so a root target falls back to the
    /// default folder.
    pub fn resolve(&self, current: &FolderPath) -> FolderPath {
        match self {
            Self::Current => FolderPath::parse(&current.join()),
            Self::Folder(path) => FolderPath::parse(&path.join()),
            Self::Override(folder) => FolderPath::parse(folder),
        }
    }
}

/// Client-side state of one media browsing session.
#[derive(Debug)]
pub struct MediaLibrary {
    metadata: Arc<dyn MetadataStore>,
    uploads: UploadCoordinator,
    deletions: DeletionCoordinator,
    moves: MoveCoordinator,
    retirement: RetirementPolicy,
    /// Asset snapshot, stably sorted by id.
    assets: Vec<Asset>,
    overlay: VirtualOverlay,
    current: FolderPath,
    selection: BTreeSet<AssetId>,
    /// Why the last refresh failed; cleared by the next successful one.
    refresh_error: Option<AppError>,
}

impl MediaLibrary {
    /// Build a library on top of the configured stores. Call
    /// [`MediaLibrary::refresh`] to load the first snapshot.
    pub fn new(stores: &StoreManager, config: &AppConfig) -> Self {
        Self {
            metadata: stores.metadata(),
            uploads: UploadCoordinator::new(
                stores.metadata(),
                stores.assets(),
                config.upload.clone(),
            ),
            deletions: DeletionCoordinator::new(stores.metadata(), stores.assets()),
            moves: MoveCoordinator::new(stores.metadata()),
            retirement: config.deletion.retirement,
            assets: Vec::new(),
            overlay: VirtualOverlay::new(),
            current: FolderPath::root(),
            selection: BTreeSet::new(),
            refresh_error: None,
        }
    }

    /// Reload the asset list and drop overlay entries that gained assets.
    pub async fn refresh(&mut self) -> AppResult<()> {
        let mut assets = match self.metadata.list().await {
            Ok(assets) => assets,
            Err(e) => {
                self.refresh_error = Some(e.clone());
                return Err(e);
            }
        };
        assets.sort_by(|a, b| a.id.cmp(&b.id));

        let promoted = self.overlay.drop_backed(&build_tree(&assets));
        for path in &promoted {
            debug!(path = %path, "Virtual folder now backed by assets");
        }

        self.selection
            .retain(|id| assets.iter().any(|asset| &asset.id == id));
        self.assets = assets;
        self.refresh_error = None;
        Ok(())
    }

    /// Refresh after a mutation. A failure leaves the previous snapshot in
    /// place and is kept for [`MediaLibrary::refresh_error`] instead of
    /// hiding the mutation's own report.
    async fn refresh_after(&mut self, action: &str) {
        if let Err(e) = self.refresh().await {
            warn!(action, error = %e, "Snapshot refresh failed; view may be stale");
        }
    }

    /// The error of the last refresh, if it failed. The snapshot is stale
    /// until a later refresh succeeds.
    pub fn refresh_error(&self) -> Option<&AppError> {
        self.refresh_error.as_ref()
    }

    /// The current asset snapshot.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// The virtual overlay.
    pub fn overlay(&self) -> &VirtualOverlay {
        &self.overlay
    }

    /// Folder tree built from the snapshot, with virtual folders merged in.
    pub fn tree(&self) -> FolderNode {
        merge_overlay(build_tree(&self.assets), &self.overlay)
    }

    /// Current navigation path.
    pub fn current_path(&self) -> &FolderPath {
        &self.current
    }

    /// The node at the current path. Stale paths resolve to an empty node.
    pub fn current_folder(&self) -> FolderNode {
        self.tree().resolve(&self.current).clone()
    }

    /// The node at `path`. Stale paths resolve to an empty node.
    pub fn folder(&self, path: &FolderPath) -> FolderNode {
        self.tree().resolve(path).clone()
    }

    pub fn navigate(&mut self, path: FolderPath) {
        self.current = path;
    }

    pub fn navigate_up(&mut self) {
        self.current = self.current.parent();
    }

    pub fn enter(&mut self, name: &str) {
        self.current = self.current.child(name);
    }

    /// Create an empty virtual folder under the current path.
    pub fn create_folder(&mut self, name: &str) -> AppResult<FolderPath> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if name.contains('/') {
            return Err(AppError::validation("Folder name cannot contain '/'"));
        }
        if name == "." || name == ".." {
            return Err(AppError::validation(format!(
                "'{name}' is not a valid folder name"
            )));
        }
        if self.current_folder().child(name).is_some() {
            return Err(AppError::conflict(format!(
                "Folder '{name}' already exists in '{}'",
                self.current
            )));
        }

        let path = self.current.child(name);
        self.overlay.add(path.clone());
        info!(path = %path, "Virtual folder created");
        Ok(path)
    }

    pub fn select(&mut self, id: AssetId) -> bool {
        self.selection.insert(id)
    }

    pub fn deselect(&mut self, id: &AssetId) -> bool {
        self.selection.remove(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected asset ids, in id order.
    pub fn selection(&self) -> &BTreeSet<AssetId> {
        &self.selection
    }

    /// Move the selected assets to `destination`.
    ///
    /// On success the selection is cleared. The snapshot is refreshed in
    /// both cases so assets moved before a failure show up in their new
    /// folder. Ids are moved in selection order; use
    /// [`MediaLibrary::move_assets`] to keep a caller-given order.
    pub async fn move_selected(&mut self, destination: &str) -> AppResult<MoveReport> {
        let ids: Vec<AssetId> = self.selection.iter().cloned().collect();
        if ids.is_empty() {
            return Err(AppError::validation("No assets selected"));
        }

        let result = self.moves.move_assets(&ids, destination).await;
        if result.is_ok() {
            self.selection.clear();
        }
        self.refresh_after("move").await;
        result
    }

    /// Move `ids` to `destination` in the given order, bypassing the
    /// selection. Ids that are also selected are deselected on success.
    pub async fn move_assets(
        &mut self,
        ids: &[AssetId],
        destination: &str,
    ) -> AppResult<MoveReport> {
        if ids.is_empty() {
            return Err(AppError::validation("No assets to move"));
        }

        let result = self.moves.move_assets(ids, destination).await;
        if result.is_ok() {
            for id in ids {
                self.selection.remove(id);
            }
        }
        self.refresh_after("move").await;
        result
    }

    /// Delete the folder at `path` and everything beneath it.
    ///
    /// `policy` overrides the configured retirement policy for this call.
    /// When the folder is retired and the current path was inside it,
    /// navigation moves to the deleted folder's parent.
    pub async fn delete_folder(
        &mut self,
        path: &FolderPath,
        policy: Option<RetirementPolicy>,
    ) -> AppResult<FolderDeletionReport> {
        let tree = self.tree();
        let policy = policy.unwrap_or(self.retirement);
        let report = self
            .deletions
            .delete_folder(&tree, &mut self.overlay, path, policy)
            .await?;

        if report.is_retired() && self.current.starts_with(path) {
            self.current = report.navigate_to();
        }
        self.refresh_after("delete folder").await;
        Ok(report)
    }

    /// Upload `files` to `target`, publishing the aggregate percentage on
    /// `progress`, then refresh the snapshot.
    pub async fn upload(
        &mut self,
        files: Vec<UploadFile>,
        target: UploadTarget,
        progress: watch::Sender<u8>,
    ) -> UploadReport {
        let folder = target.resolve(&self.current);
        let report = self.uploads.upload(files, &folder, progress).await;
        self.refresh_after("upload").await;
        report
    }

    /// Observe folder deletion phases.
    pub fn subscribe_deletions(&self) -> watch::Receiver<DeletionPhase> {
        self.deletions.subscribe()
    }
}
