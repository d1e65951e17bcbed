//! # mediahub-store
//!
//! Collaborator implementations for MediaHub: metadata stores (in-memory,
//! REST over HTTP) and remote asset stores (local filesystem, HTTP CDN),
//! plus the URL to object-id derivation used for remote deletes.

pub mod manager;
pub mod object_id;
pub mod progress;
pub mod providers;

pub use manager::StoreManager;
pub use object_id::object_id_from_url;
