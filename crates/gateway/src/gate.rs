//! Shared request gate
//!
//! Uniform pre-processing run ahead of every endpoint, in fixed order:
//! query parsing, method allow-list, token authentication. Each step
//! short-circuits with its own terminal response, so malformed requests
//! never reach the auth check and unauthenticated requests never reach
//! the resolver or any file I/O. Only requests that clear all three
//! steps get the CORS header set applied to whatever the endpoint
//! eventually responds with.

use axum::extract::Query;
use axum::http::header::{self, HeaderValue};
use axum::http::{Method, Uri};
use axum::response::Response;

use crate::config::Config;
use crate::error::RequestError;

/// Methods both endpoints accept
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::HEAD, Method::OPTIONS];

/// Allow-list as advertised in `Access-Control-Allow-Methods`
pub const ALLOWED_METHODS_HEADER: &str = "GET,HEAD,OPTIONS";

/// Query parameters that passed the gate
///
/// Preserves every pair as sent; lookups return the first occurrence,
/// matching form semantics.
#[derive(Debug)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Run the gate for one request
///
/// Returns the parsed parameters on success, or the terminal error
/// response for the first failing step.
pub fn check(config: &Config, method: &Method, uri: &Uri) -> Result<Params, RequestError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|rejection| RequestError::MalformedQuery(rejection.body_text()))?;
    let params = Params(pairs);

    if !ALLOWED_METHODS.contains(method) {
        return Err(RequestError::MethodNotAllowed);
    }

    // Exact, case-sensitive comparison against the configured token
    match params.get("AuthToken") {
        Some(token) if token == config.auth_token => Ok(params),
        _ => Err(RequestError::NoAccess),
    }
}

/// Apply the fixed CORS header set to a gated response
///
/// Emitted only after the gate passes, on every downstream response
/// including resolver 404s. The set enables cross-origin range-based
/// playback from browser audio elements.
pub fn apply_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("range"),
    );
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS_HEADER),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Range"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn test_config(token: &str) -> (Config, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(
            8080,
            dir.path().to_str().unwrap(),
            token,
            PathBuf::from("TrackIndex.json"),
        )
        .unwrap();
        (config, dir)
    }

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_passes_with_valid_token() {
        let (config, _dir) = test_config("secret");
        let params = check(
            &config,
            &Method::GET,
            &uri("/tracks/getAsBinary?AuthToken=secret&TrackID=42"),
        )
        .unwrap();
        assert_eq!(params.get("TrackID"), Some("42"));
    }

    #[test]
    fn test_missing_token_rejected() {
        let (config, _dir) = test_config("secret");
        let err = check(&config, &Method::GET, &uri("/tracks/getIndex")).unwrap_err();
        assert_eq!(err, RequestError::NoAccess);
    }

    #[test]
    fn test_wrong_token_rejected() {
        let (config, _dir) = test_config("secret");
        let err = check(
            &config,
            &Method::GET,
            &uri("/tracks/getIndex?AuthToken=WRONG"),
        )
        .unwrap_err();
        assert_eq!(err, RequestError::NoAccess);
    }

    #[test]
    fn test_token_comparison_is_case_sensitive() {
        let (config, _dir) = test_config("Secret");
        let err = check(
            &config,
            &Method::GET,
            &uri("/tracks/getIndex?AuthToken=secret"),
        )
        .unwrap_err();
        assert_eq!(err, RequestError::NoAccess);
    }

    #[test]
    fn test_disallowed_method_rejected() {
        let (config, _dir) = test_config("secret");
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let err = check(
                &config,
                &method,
                &uri("/tracks/getIndex?AuthToken=secret"),
            )
            .unwrap_err();
            assert_eq!(err, RequestError::MethodNotAllowed);
        }
    }

    #[test]
    fn test_allowed_methods_pass() {
        let (config, _dir) = test_config("secret");
        for method in ALLOWED_METHODS {
            assert!(check(&config, &method, &uri("/x?AuthToken=secret")).is_ok());
        }
    }

    #[test]
    fn test_method_checked_before_auth() {
        // A bad method loses to 405 even without any token
        let (config, _dir) = test_config("secret");
        let err = check(&config, &Method::POST, &uri("/tracks/getIndex")).unwrap_err();
        assert_eq!(err, RequestError::MethodNotAllowed);
    }

    #[test]
    fn test_params_first_occurrence_wins() {
        let (config, _dir) = test_config("secret");
        let params = check(
            &config,
            &Method::GET,
            &uri("/x?AuthToken=secret&TrackID=1&TrackID=2"),
        )
        .unwrap();
        assert_eq!(params.get("TrackID"), Some("1"));
    }

    #[test]
    fn test_cors_header_set() {
        let response = apply_cors_headers(().into_response());
        let headers = response.headers();

        assert_eq!(headers["Access-Control-Allow-Credentials"], "true");
        assert_eq!(headers["Access-Control-Allow-Headers"], "range");
        assert_eq!(headers["Accept-Ranges"], "bytes");
        assert_eq!(headers["Access-Control-Allow-Methods"], "GET,HEAD,OPTIONS");
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(headers["Access-Control-Expose-Headers"], "Content-Range");
        assert_eq!(headers["Access-Control-Max-Age"], "86400");
    }
}
