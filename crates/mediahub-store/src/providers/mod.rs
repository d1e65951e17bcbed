//! Metadata store and asset store implementations.

pub mod cdn;
pub mod http;
pub mod local;
pub mod memory;

pub use cdn::CdnAssetStore;
pub use http::HttpMetadataStore;
pub use local::LocalAssetStore;
pub use memory::InMemoryMetadataStore;
