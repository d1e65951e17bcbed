//! Folder domain entities.

pub mod path;
pub mod tree;

pub use path::{DEFAULT_FOLDER, FolderPath};
pub use tree::FolderNode;
