//! Multi-file upload pipeline.

pub mod progress;
pub mod service;

pub use progress::ProgressAggregator;
pub use service::{UploadCoordinator, UploadOutcome, UploadReport};
