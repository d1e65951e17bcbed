//! Local filesystem asset store.
//!
//! Objects are written under a root directory and addressed by URLs shaped
//! like a CDN delivery URL (`{base}/upload/v{n}/{folder}/{file}`), so the
//! same object-id derivation works for both providers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::result::AppResult;
use mediahub_core::traits::{AssetStore, ProgressFn};
use mediahub_core::types::{StoredObject, UploadFile};
use mediahub_entity::FolderPath;

use crate::progress::{DEFAULT_CHUNK_SIZE, fraction};

/// Local filesystem asset store.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    /// Root directory for stored objects.
    root: PathBuf,
    /// Base URL prepended to object URLs.
    public_base_url: String,
}

impl LocalAssetStore {
    /// Create a new local asset store, creating the root directory if needed.
    pub async fn new(root: impl AsRef<Path>, public_base_url: &str) -> AppResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create asset root {}: {e}", root.display()),
                e,
            )
        })?;

        info!(root = %root.display(), "Local asset store initialized");

        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve an object key (`folder/stem`) to its directory and stem,
    /// rejecting keys that would escape the root.
    fn resolve_key(&self, key: &str) -> AppResult<(PathBuf, String)> {
        let path = FolderPath::navigation(key);
        if path.segments().iter().any(|s| s == "." || s == "..") {
            return Err(AppError::validation(format!("Invalid object key: {key}")));
        }
        let stem = path
            .name()
            .ok_or_else(|| AppError::validation("Empty object key"))?
            .to_string();
        let mut dir = self.root.clone();
        for segment in path.parent().segments() {
            dir.push(segment);
        }
        Ok((dir, stem))
    }
}

/// Split a file name into a stem and an optional extension.
fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn upload(
        &self,
        file: &UploadFile,
        folder: &str,
        progress: &ProgressFn<'_>,
    ) -> AppResult<StoredObject> {
        let folder_path = FolderPath::parse(folder);
        let (stem, ext) = split_name(&file.name);
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let object_name = match ext {
            Some(ext) => format!("{stem}_{}.{ext}", &suffix[..8]),
            None => format!("{stem}_{}", &suffix[..8]),
        };

        let key = folder_path.child(object_name.clone()).join();
        let (dir, file_name) = self.resolve_key(&key)?;
        fs::create_dir_all(&dir).await?;

        let mut out = fs::File::create(dir.join(&file_name)).await?;
        let total = file.size();
        let mut written = 0u64;
        progress(0.0);
        for chunk in file.data.chunks(DEFAULT_CHUNK_SIZE) {
            out.write_all(chunk).await?;
            written += chunk.len() as u64;
            progress(fraction(written, total));
        }
        out.flush().await?;

        let version = chrono::Utc::now().timestamp();
        let url = format!("{}/upload/v{version}/{key}", self.public_base_url);

        debug!(file = %file.name, url = %url, bytes = written, "Object stored");
        Ok(StoredObject { url })
    }

    async fn delete_by_object_id(&self, object_id: &str) -> AppResult<bool> {
        let (dir, stem) = self.resolve_key(object_id)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if split_name(&name).0 == stem && entry.file_type().await?.is_file() {
                fs::remove_file(entry.path()).await?;
                debug!(object_id, "Object deleted");
                return Ok(true);
            }
        }

        Ok(false)
    }
}
