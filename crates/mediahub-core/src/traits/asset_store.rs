//! Remote asset store trait for pluggable object storage backends.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{StoredObject, UploadFile};

/// Callback receiving the fractional progress (0.0 to 1.0) of one transfer.
pub type ProgressFn<'a> = dyn Fn(f64) + Send + Sync + 'a;

/// Trait for remote asset stores.
///
/// Implementations exist for the local filesystem and for an HTTP CDN.
/// Deletion is advisory: callers treat a failure as non-fatal.
#[async_trait]
pub trait AssetStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "cdn").
    fn provider_type(&self) -> &str;

    /// Store a file under `folder`, reporting progress as bytes go out.
    async fn upload(
        &self,
        file: &UploadFile,
        folder: &str,
        progress: &ProgressFn<'_>,
    ) -> AppResult<StoredObject>;

    /// Delete an object by the id derived from its URL. Returns `true` if removed.
    async fn delete_by_object_id(&self, object_id: &str) -> AppResult<bool>;
}
