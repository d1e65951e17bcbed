//! Upload payloads and transfer results.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name as chosen by the user.
    pub name: String,
    /// MIME type (if known).
    pub content_type: Option<String>,
    /// File content bytes.
    pub data: Bytes,
}

impl UploadFile {
    /// Create a new upload payload.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    /// Attach a MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Result of a successful transfer to the remote asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Public URL of the stored object.
    pub url: String,
}
