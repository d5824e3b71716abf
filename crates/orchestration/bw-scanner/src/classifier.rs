//! Extension-based classification of object keys.
//!
//! A key is anomalous when its lowercased form ends with one of the
//! extensions in an [`ExtensionSet`]. Keys ending in the path separator are
//! structural (prefix markers) and never anomalous.

use serde::Serialize;

/// Extensions flagged by default: audio, video, disk images and junk files
/// that should not live in data buckets.
pub const DEFAULT_ANOMALOUS_EXTENSIONS: &[&str] = &[
    // audio
    ".mp3", ".wav", ".flac", ".aac", ".m4a", ".ogg", ".wma", ".aiff",
    // video
    ".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv", ".webm", ".m4v", ".mpg", ".mpeg", ".3gp",
    // disk images and containers
    ".iso", ".dmg", ".img", ".vmdk", ".torrent",
    // junk
    ".tmp", ".temp", ".bak", ".swp", ".crdownload", ".part", ".ds_store",
];

/// Fixed set of case-insensitive suffixes marking anomalous files.
///
/// Built once from a static list and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionSet {
    extensions: Vec<String>,
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::from_static(DEFAULT_ANOMALOUS_EXTENSIONS)
    }
}

impl ExtensionSet {
    /// Build a set from a static extension list.
    ///
    /// Entries are lowercased; a missing leading dot is added so `"mp3"` and
    /// `".mp3"` are equivalent.
    pub fn from_static(extensions: &[&str]) -> Self {
        let mut normalized: Vec<String> = extensions
            .iter()
            .map(|ext| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty() && ext != ".")
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        // Longest first: overlapping suffixes report the most specific match.
        normalized.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        normalized.dedup();

        Self {
            extensions: normalized,
        }
    }

    /// Check if a key denotes an anomalous file.
    pub fn is_anomalous(&self, key: &str) -> bool {
        self.extension_of(key).is_some()
    }

    /// The extension a key matched, if any.
    pub fn extension_of(&self, key: &str) -> Option<&str> {
        if key.is_empty() || key.ends_with('/') {
            return None;
        }
        let lower = key.to_lowercase();
        self.extensions
            .iter()
            .find(|ext| lower.ends_with(ext.as_str()))
            .map(String::as_str)
    }

    /// The normalized extensions in this set.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Number of extensions in the set.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Get a human-readable description of this set, used for logging.
    pub fn description(&self) -> String {
        format!("extensions({})", self.extensions.join(","))
    }
}

/// Check a key against the default extension set.
pub fn is_anomalous(key: &str) -> bool {
    ExtensionSet::default().is_anomalous(key)
}
