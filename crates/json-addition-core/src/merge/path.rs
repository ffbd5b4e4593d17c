use std::fmt;

use serde::{Deserialize, Serialize};

/// Dotted location of a field, joined from the document root.
///
/// Only used as the lookup key for path-specific rules; numeric segments
/// are plain strings, never array indices.
///
/// ```
/// # use json_addition_core::FieldPath;
/// let path = FieldPath::root().child("servers").child("0").child("port");
/// assert_eq!(path.as_str(), "servers.0.port");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The empty path of a document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the path of the field `key` below this one.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    /// Returns the dotted representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Indicates whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
