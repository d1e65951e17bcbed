//! Upload pipeline configuration.

use serde::{Deserialize, Serialize};

/// Upload pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum size of a single file in bytes (default 10 MB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size_bytes: u64,
    /// Number of transfers allowed in flight at once. `0` disables the cap.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_max_file_size() -> u64 {
    10_485_760 // 10 MB
}

fn default_max_concurrency() -> usize {
    4
}
