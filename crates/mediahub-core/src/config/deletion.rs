//! Folder deletion configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a folder is retired when some of its deletions fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetirementPolicy {
    /// Keep the folder visible unless every deletion was confirmed.
    #[default]
    Strict,
    /// Drop the folder from view even when the backend reported errors.
    Optimistic,
}

impl fmt::Display for RetirementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Optimistic => write!(f, "optimistic"),
        }
    }
}

/// Folder deletion configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletionConfig {
    /// Retirement policy used when a call does not pick one explicitly.
    #[serde(default)]
    pub retirement: RetirementPolicy,
}
