//! Static file responses with byte-range support
//!
//! Serves both track files and the index document. Full responses
//! stream from disk; a `Range: bytes=a-b` request is answered with 206
//! and `Content-Range` so audio players can seek without downloading
//! the whole file.

use axum::body::Body;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::error::RequestError;

/// Serve `path` as the response body, honoring a `Range` header
pub async fn serve_file(path: &Path, request_headers: &HeaderMap) -> Result<Response, RequestError> {
    let file = File::open(path)
        .await
        .map_err(|e| RequestError::Io(format!("Failed to open file: {}", e)))?;

    let metadata = file
        .metadata()
        .await
        .map_err(|e| RequestError::Io(format!("Failed to get file metadata: {}", e)))?;
    let file_size = metadata.len();

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    if let Some(range_header) = request_headers.get(header::RANGE) {
        let range_str = range_header
            .to_str()
            .map_err(|_| RequestError::InvalidRange("Invalid range header".to_string()))?;
        let (start, end) = parse_range(range_str, file_size)?;
        return serve_range(file, start, end, file_size, &mime_type).await;
    }

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, file_size)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| RequestError::Io(format!("Failed to build response: {}", e)))
}

/// Parse a `Range` header value against a known file size
///
/// Accepts the single-range forms `bytes=a-b`, `bytes=a-` and the
/// suffix form `bytes=-n`. Multi-range requests are rejected as
/// malformed, matching what single-file audio playback needs.
fn parse_range(value: &str, file_size: u64) -> Result<(u64, u64), RequestError> {
    let spec = value
        .strip_prefix("bytes=")
        .ok_or_else(|| RequestError::InvalidRange("Invalid range format".to_string()))?;

    let (start_str, end_str) = spec
        .split_once('-')
        .ok_or_else(|| RequestError::InvalidRange("Invalid range format".to_string()))?;

    // Suffix form: last n bytes of the file
    if start_str.is_empty() {
        let suffix: u64 = end_str
            .parse()
            .map_err(|_| RequestError::InvalidRange("Invalid range end".to_string()))?;
        if suffix == 0 || file_size == 0 {
            return Err(RequestError::RangeNotSatisfiable(file_size));
        }
        let start = file_size.saturating_sub(suffix);
        return Ok((start, file_size - 1));
    }

    let start: u64 = start_str
        .parse()
        .map_err(|_| RequestError::InvalidRange("Invalid range start".to_string()))?;

    let end: u64 = if end_str.is_empty() {
        file_size.saturating_sub(1)
    } else {
        end_str
            .parse::<u64>()
            .map_err(|_| RequestError::InvalidRange("Invalid range end".to_string()))?
            .min(file_size.saturating_sub(1))
    };

    if start > end || start >= file_size {
        return Err(RequestError::RangeNotSatisfiable(file_size));
    }

    Ok((start, end))
}

/// Answer a parsed range with 206 Partial Content
async fn serve_range(
    mut file: File,
    start: u64,
    end: u64,
    file_size: u64,
    mime_type: &str,
) -> Result<Response, RequestError> {
    let content_length = end - start + 1;

    file.seek(std::io::SeekFrom::Start(start))
        .await
        .map_err(|e| RequestError::Io(format!("Failed to seek file: {}", e)))?;

    let mut buffer = vec![0; content_length as usize];
    file.read_exact(&mut buffer)
        .await
        .map_err(|e| RequestError::Io(format!("Failed to read file: {}", e)))?;

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", start, end, file_size),
        )
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from(buffer))
        .map_err(|e| RequestError::Io(format!("Failed to build response: {}", e)))
}
