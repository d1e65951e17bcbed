//! Folder path codec.
//!
//! An asset's folder attribute is a `/`-delimited string. [`FolderPath`]
//! is its parsed form: an ordered list of non-empty, case-sensitive
//! segments. The empty path is the root of the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

use mediahub_core::types::Asset;

/// Segment used for assets whose folder attribute is empty or missing.
pub const DEFAULT_FOLDER: &str = "default";

/// A parsed folder path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderPath(Vec<String>);

impl FolderPath {
    /// The root path (no segments).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse an asset folder attribute.
    ///
    /// Empty segments are dropped; an attribute with no segments left
    /// resolves to [`DEFAULT_FOLDER`].
    pub fn parse(folder: &str) -> Self {
        let path = Self::navigation(folder);
        if path.is_root() {
            Self(vec![DEFAULT_FOLDER.to_string()])
        } else {
            path
        }
    }

    /// Parse an optional folder attribute; `None` behaves like `""`.
    pub fn parse_opt(folder: Option<&str>) -> Self {
        Self::parse(folder.unwrap_or_default())
    }

    /// Parse a navigation path, where the empty string denotes the root.
    pub fn navigation(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Build a path from explicit segments, dropping empty ones.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(Into::into)
                .filter(|segment: &String| !segment.is_empty())
                .collect(),
        )
    }

    /// The folder path of an asset.
    pub fn of(asset: &Asset) -> Self {
        Self::parse(&asset.folder)
    }

    /// Join the segments with `/`. The root joins to `""`.
    pub fn join(&self) -> String {
        self.0.join("/")
    }

    /// The ordered segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// The path one level up. The root is its own parent.
    pub fn parent(&self) -> Self {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    /// The path of a direct child.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self::from_segments(segments)
    }

    /// Whether `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &FolderPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("/")
        } else {
            f.write_str(&self.join())
        }
    }
}

impl From<&[&str]> for FolderPath {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments.iter().copied())
    }
}
