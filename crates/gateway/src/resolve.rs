//! TrackID to filesystem path resolution
//!
//! Runs only after the gate has passed, so an unauthenticated caller can
//! never learn whether a track exists. The two 404 variants are
//! deliberate: "not in the index" means the index document is stale,
//! "not on disk" means the file moved or was deleted after indexing.

use std::path::Path;

use manifest::Manifest;

use crate::config::Config;
use crate::error::RequestError;

/// Resolve a TrackID to the absolute path of its file
///
/// The index may carry backslash separators; they are normalized to
/// forward slashes before joining onto the music root.
pub fn resolve_track(
    config: &Config,
    manifest: &Manifest,
    track_id: Option<&str>,
) -> Result<String, RequestError> {
    let track_id = match track_id {
        Some(id) if !id.is_empty() => id,
        _ => return Err(RequestError::MissingTrackId),
    };

    let entry = manifest
        .lookup(track_id)
        .ok_or_else(|| RequestError::NotInIndex(track_id.to_string()))?;

    let relative_path = entry.relative_path.replace('\\', "/");
    let path = format!("{}{}/{}", config.music_root, relative_path, entry.file_name);

    if !Path::new(&path).exists() {
        return Err(RequestError::NotOnDisk(track_id.to_string()));
    }

    Ok(path)
}
