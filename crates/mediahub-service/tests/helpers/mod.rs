//! Shared collaborator doubles for service integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mediahub_core::error::AppError;
use mediahub_core::result::AppResult;
use mediahub_core::traits::{AssetStore, MetadataStore, ProgressFn};
use mediahub_core::types::{
    Asset, AssetId, AssetUpdate, CreateAsset, FolderDeleteSummary, StoredObject, UploadFile,
};
use mediahub_store::StoreManager;
use mediahub_store::providers::InMemoryMetadataStore;

/// One collaborator call, in the order it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(String),
    Update(AssetId, String),
    Delete(AssetId),
    DeleteFolder(String),
    Upload(String),
    RemoteDelete(String),
}

/// Call log shared by both doubles.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Calls other than `List`, which every refresh issues.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::List)
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// In-memory metadata store that records calls and fails on request.
#[derive(Debug)]
pub struct RecordingMetadataStore {
    inner: InMemoryMetadataStore,
    log: CallLog,
    fail_delete: Mutex<HashSet<AssetId>>,
    fail_update: Mutex<HashSet<AssetId>>,
    fail_delete_folder: AtomicBool,
    reject_create: Mutex<HashSet<String>>,
    lists_left: AtomicUsize,
}

impl RecordingMetadataStore {
    pub fn new(assets: Vec<Asset>, log: CallLog) -> Self {
        Self {
            inner: InMemoryMetadataStore::with_assets(assets),
            log,
            fail_delete: Mutex::new(HashSet::new()),
            fail_update: Mutex::new(HashSet::new()),
            fail_delete_folder: AtomicBool::new(false),
            reject_create: Mutex::new(HashSet::new()),
            lists_left: AtomicUsize::new(usize::MAX),
        }
    }

    pub fn fail_delete_of(&self, id: &str) {
        self.fail_delete.lock().unwrap().insert(AssetId::from(id));
    }

    pub fn fail_update_of(&self, id: &str) {
        self.fail_update.lock().unwrap().insert(AssetId::from(id));
    }

    pub fn fail_delete_folder(&self) {
        self.fail_delete_folder.store(true, Ordering::SeqCst);
    }

    /// Answer `create` for `name` with a validation error, as a store
    /// answering HTTP 422 would.
    pub fn reject_create_of(&self, name: &str) {
        self.reject_create.lock().unwrap().insert(name.to_string());
    }

    /// Let `n` more `list` calls succeed, then fail every one after.
    pub fn fail_lists_after(&self, n: usize) {
        self.lists_left.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl MetadataStore for RecordingMetadataStore {
    fn provider_type(&self) -> &str {
        "recording"
    }

    async fn list(&self) -> AppResult<Vec<Asset>> {
        self.log.push(Call::List);
        let left = self.lists_left.load(Ordering::SeqCst);
        if left == 0 {
            return Err(AppError::external("list timeout"));
        }
        if left != usize::MAX {
            self.lists_left.store(left - 1, Ordering::SeqCst);
        }
        self.inner.list().await
    }

    async fn create(&self, asset: &CreateAsset) -> AppResult<Asset> {
        self.log.push(Call::Create(asset.name.clone()));
        if self.reject_create.lock().unwrap().contains(&asset.name) {
            return Err(AppError::validation("HTTP 422 folder attribute refused"));
        }
        self.inner.create(asset).await
    }

    async fn update(&self, id: &AssetId, update: &AssetUpdate) -> AppResult<Asset> {
        self.log.push(Call::Update(
            id.clone(),
            update.folder.clone().unwrap_or_default(),
        ));
        if self.fail_update.lock().unwrap().contains(id) {
            return Err(AppError::external("connection reset"));
        }
        self.inner.update(id, update).await
    }

    async fn delete(&self, id: &AssetId) -> AppResult<()> {
        self.log.push(Call::Delete(id.clone()));
        if self.fail_delete.lock().unwrap().contains(id) {
            return Err(AppError::external("connection reset"));
        }
        self.inner.delete(id).await
    }

    async fn delete_folder(&self, path: &str) -> AppResult<FolderDeleteSummary> {
        self.log.push(Call::DeleteFolder(path.to_string()));
        if self.fail_delete_folder.load(Ordering::SeqCst) {
            return Err(AppError::external("folder endpoint unavailable"));
        }
        self.inner.delete_folder(path).await
    }
}

/// Asset store that simulates chunked transfers and records calls.
#[derive(Debug)]
pub struct RecordingAssetStore {
    log: CallLog,
    steps: Vec<f64>,
    fail_upload: Mutex<HashSet<String>>,
    fail_remote_delete: AtomicBool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingAssetStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            steps: vec![0.25, 0.5, 0.75, 1.0],
            fail_upload: Mutex::new(HashSet::new()),
            fail_remote_delete: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn fail_upload_of(&self, name: &str) {
        self.fail_upload.lock().unwrap().insert(name.to_string());
    }

    pub fn fail_remote_deletes(&self) {
        self.fail_remote_delete.store(true, Ordering::SeqCst);
    }

    /// Highest number of uploads observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetStore for RecordingAssetStore {
    fn provider_type(&self) -> &str {
        "recording"
    }

    async fn upload(
        &self,
        file: &UploadFile,
        folder: &str,
        progress: &ProgressFn<'_>,
    ) -> AppResult<StoredObject> {
        self.log.push(Call::Upload(file.name.clone()));
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let fails = self.fail_upload.lock().unwrap().contains(&file.name);
        for step in &self.steps {
            tokio::task::yield_now().await;
            if fails && *step > 0.5 {
                break;
            }
            progress(*step);
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if fails {
            return Err(AppError::external("upload interrupted"));
        }
        Ok(StoredObject {
            url: format!("https://cdn.test/media/upload/v1/{folder}/{}", file.name),
        })
    }

    async fn delete_by_object_id(&self, object_id: &str) -> AppResult<bool> {
        self.log.push(Call::RemoteDelete(object_id.to_string()));
        if self.fail_remote_delete.load(Ordering::SeqCst) {
            return Err(AppError::external("rate limited"));
        }
        Ok(true)
    }
}

/// Both doubles sharing one call log.
pub struct Harness {
    pub log: CallLog,
    pub metadata: Arc<RecordingMetadataStore>,
    pub assets: Arc<RecordingAssetStore>,
}

impl Harness {
    pub fn new(assets: Vec<Asset>) -> Self {
        let log = CallLog::default();
        Self {
            metadata: Arc::new(RecordingMetadataStore::new(assets, log.clone())),
            assets: Arc::new(RecordingAssetStore::new(log.clone())),
            log,
        }
    }

    pub fn stores(&self) -> StoreManager {
        StoreManager::new(self.metadata.clone(), self.assets.clone())
    }
}

pub fn asset(id: &str, folder: &str) -> Asset {
    Asset {
        id: AssetId::from(id),
        url: format!("https://cdn.test/media/upload/v1/{folder}/{id}.png"),
        name: format!("{id}.png"),
        folder: folder.to_string(),
    }
}

pub fn file(name: &str, size: usize) -> UploadFile {
    UploadFile::new(name, vec![0u8; size])
}
