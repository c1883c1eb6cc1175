//! Language record: metadata for one installed locale.
//!
//! Each installed language ships a `language.json` next to its namespace
//! files. The record is read verbatim; validity is checked by the resolver
//! before a record is handed out.

use serde::{Deserialize, Deserializer, Serialize};

/// An installed language as described by its `language.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Language {
    /// Display name (e.g., "English (United States)")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// Canonical locale code (e.g., "en-US")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code: String,

    /// Folder name under the language root; may differ from `code`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub dir: String,
}

impl Language {
    /// Create a language record.
    pub fn new(name: impl Into<String>, code: impl Into<String>, dir: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            dir: dir.into(),
        }
    }

    /// Check that `code`, `name` and `dir` are all present.
    ///
    /// # Returns
    /// `true` if none of the three fields is empty.
    pub fn is_valid(&self) -> bool {
        !self.code.is_empty() && !self.name.is_empty() && !self.dir.is_empty()
    }
}

/// Treat an explicit `null` like an absent key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
