//! Timeago locale support.
//!
//! The relative-time formatter ships one file per locale, named
//! `jquery.timeago.<code>.js`. The set of codes is read once at startup and
//! never changes afterwards.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

const TIMEAGO_FILE_PREFIX: &str = "jquery.timeago";

/// Immutable set of locale codes supported by the timeago dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeagoCodes {
    codes: BTreeSet<String>,
}

impl TimeagoCodes {
    /// Build the set from file names.
    ///
    /// Only names starting with `jquery.timeago` count; the code is the third
    /// dot-separated segment.
    pub fn from_filenames<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                if !name.starts_with(TIMEAGO_FILE_PREFIX) {
                    return None;
                }
                name.split('.').nth(2).map(str::to_string)
            })
            .collect();
        Self { codes }
    }

    /// Build the set by listing a locale directory.
    ///
    /// A missing directory yields an empty set so that a host without the
    /// timeago dataset still starts.
    pub fn from_dir(dir: &Path) -> std::io::Result<Self> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Timeago locale directory {} not found", dir.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        let codes = Self::from_filenames(names);
        debug!("Loaded {} timeago codes from {}", codes.len(), dir.display());
        Ok(codes)
    }

    /// Check whether a timeago code is available.
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate codes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

/// Map a user language code to the matching timeago code.
///
/// Most codes are identical; a handful of regional variants collapse onto
/// the dataset's naming.
pub fn user_lang_to_timeago_code(user_lang: &str) -> &str {
    match user_lang {
        "en-GB" | "en-US" => "en",
        "fa-IR" => "fa",
        "pt-BR" => "pt-br",
        "nb" => "no",
        other => other,
    }
}
