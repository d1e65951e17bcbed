//! Metadata store and remote asset store configuration.

use serde::{Deserialize, Serialize};

/// Metadata store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataStoreConfig {
    /// Provider: `"memory"` or `"http"`.
    #[serde(default = "default_metadata_provider")]
    pub provider: String,
    /// Base URL of the REST metadata endpoint (http provider only).
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MetadataStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_metadata_provider(),
            base_url: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Remote asset store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetStoreConfig {
    /// Provider: `"local"` or `"cdn"`.
    #[serde(default = "default_asset_provider")]
    pub provider: String,
    /// Local filesystem asset store configuration.
    #[serde(default)]
    pub local: LocalAssetStoreConfig,
    /// HTTP CDN asset store configuration.
    #[serde(default)]
    pub cdn: CdnAssetStoreConfig,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for AssetStoreConfig {
    fn default() -> Self {
        Self {
            provider: default_asset_provider(),
            local: LocalAssetStoreConfig::default(),
            cdn: CdnAssetStoreConfig::default(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Local filesystem asset store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalAssetStoreConfig {
    /// Root directory the objects are written under.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// Base URL used when building public object URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for LocalAssetStoreConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// HTTP CDN asset store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CdnAssetStoreConfig {
    /// Base endpoint of the CDN API (e.g. `https://api.example.com/v1/acme`).
    #[serde(default)]
    pub endpoint: String,
    /// API key sent as a bearer token.
    #[serde(default)]
    pub api_key: String,
}

fn default_metadata_provider() -> String {
    "memory".to_string()
}

fn default_asset_provider() -> String {
    "local".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_local_root() -> String {
    "./data/media".to_string()
}

fn default_public_base_url() -> String {
    "file://media".to_string()
}
