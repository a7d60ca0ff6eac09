//! Per-request error responses
//!
//! Every failure a request can hit maps to one terminal, self-contained
//! HTTP response. Body texts are part of the wire contract: clients and
//! operators match on them to tell index drift ("not in the index") from
//! filesystem drift ("not on disk").

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Request pipeline error, ordered roughly by where in the gate or
/// resolver it can occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Query string failed to parse; carries the parser's message
    MalformedQuery(String),
    /// Method outside the endpoint allow-list
    MethodNotAllowed,
    /// AuthToken missing or not an exact match
    NoAccess,
    /// TrackID parameter missing or empty
    MissingTrackId,
    /// TrackID has no entry in the index
    NotInIndex(String),
    /// Indexed, but the resolved path is gone from disk
    NotOnDisk(String),
    /// Range header present but not parseable
    InvalidRange(String),
    /// Range header parsed but lies outside the file
    RangeNotSatisfiable(u64),
    /// File I/O failed mid-serve
    Io(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RequestError::MalformedQuery(msg) => (StatusCode::BAD_REQUEST, msg),
            // 405 is the one response with a deliberately empty body
            RequestError::MethodNotAllowed => {
                return StatusCode::METHOD_NOT_ALLOWED.into_response();
            }
            RequestError::NoAccess => (StatusCode::UNAUTHORIZED, "No access".to_string()),
            RequestError::MissingTrackId => (
                StatusCode::NOT_FOUND,
                "Missing query param or query param empty: TrackID".to_string(),
            ),
            RequestError::NotInIndex(id) => (
                StatusCode::NOT_FOUND,
                format!("Track with this ID does not exist in the index: {}", id),
            ),
            RequestError::NotOnDisk(id) => (
                StatusCode::NOT_FOUND,
                format!("Track with this ID does not exist on disk: {}", id),
            ),
            RequestError::InvalidRange(msg) => (StatusCode::BAD_REQUEST, msg),
            RequestError::RangeNotSatisfiable(size) => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                format!("Range not satisfiable. File size: {}", size),
            ),
            RequestError::Io(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_no_access_body() {
        let response = RequestError::NoAccess.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_of(response).await, "No access");
    }

    #[tokio::test]
    async fn test_method_not_allowed_empty_body() {
        let response = RequestError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_of(response).await, "");
    }

    #[tokio::test]
    async fn test_not_in_index_names_the_id() {
        let response = RequestError::NotInIndex("99".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            "Track with this ID does not exist in the index: 99"
        );
    }

    #[tokio::test]
    async fn test_not_on_disk_is_distinct_wording() {
        let response = RequestError::NotOnDisk("7".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            "Track with this ID does not exist on disk: 7"
        );
    }

    #[tokio::test]
    async fn test_missing_track_id_body() {
        let response = RequestError::MissingTrackId.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_of(response).await,
            "Missing query param or query param empty: TrackID"
        );
    }
}
