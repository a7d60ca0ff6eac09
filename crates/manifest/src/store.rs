//! Loading and lookup for the on-disk track index

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Location of a single track, relative to the music root
///
/// The index is authored by tooling that may write either separator
/// style into `RelativePath`; callers normalize to forward slashes
/// when building the absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestEntry {
    pub relative_path: String,
    pub file_name: String,
}

/// Read-only mapping from TrackID to file location
///
/// Loaded once from the index document at startup. TrackIDs are unique
/// by construction (JSON object keys). After load the mapping is never
/// mutated, so shared references are safe across concurrent requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: HashMap<String, ManifestEntry>,
}

impl Manifest {
    /// Read and parse the index document at `path`
    ///
    /// There is no partial-load mode: a missing, unreadable or malformed
    /// document is an error, and the caller is expected to treat it as
    /// fatal before accepting any connections.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::Unreadable(path.to_path_buf(), e))?;

        serde_json::from_str(&contents)
            .map_err(|e| ManifestError::Malformed(path.to_path_buf(), e))
    }

    /// Look up the entry for a TrackID
    pub fn lookup(&self, track_id: &str) -> Option<&ManifestEntry> {
        self.entries.get(track_id)
    }

    /// Number of tracks in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Errors raised while loading the index document
#[derive(Debug)]
pub enum ManifestError {
    /// The document could not be read from disk
    Unreadable(PathBuf, std::io::Error),
    /// The document is not valid index JSON
    Malformed(PathBuf, serde_json::Error),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Unreadable(path, e) => {
                write!(f, "Cannot read track index {}: {}", path.display(), e)
            }
            ManifestError::Malformed(path, e) => {
                write!(f, "Track index {} is not valid JSON: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ManifestError {}
