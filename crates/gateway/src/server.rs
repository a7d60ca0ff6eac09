//! Axum router and endpoint handlers
//!
//! Both endpoints run the same gate first, then their own logic, then
//! get the CORS header set applied to whatever they produced. Routes
//! are registered with `any()` so the gate's own 405 response applies
//! instead of the router's.

use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use manifest::Manifest;

use crate::config::Config;
use crate::error::RequestError;
use crate::{gate, resolve, stream};

/// Shared read-only state handed to every handler invocation
///
/// Config and manifest are built once before the listener starts and
/// never mutated, so cloning the state is two `Arc` bumps.
#[derive(Clone)]
pub struct GatewayState {
    config: Arc<Config>,
    manifest: Arc<Manifest>,
}

impl GatewayState {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

/// Gateway API for building and running the HTTP server
#[derive(Clone)]
pub struct GatewayApi {
    state: GatewayState,
}

impl GatewayApi {
    pub fn new(config: Config, manifest: Manifest) -> Self {
        let state = GatewayState {
            config: Arc::new(config),
            manifest: Arc::new(manifest),
        };
        Self { state }
    }

    /// Create the axum router with both track routes configured
    pub fn router(&self) -> Router {
        Router::new()
            .route("/tracks/getIndex", any(tracks_get_index))
            .route("/tracks/getAsBinary", any(tracks_get_as_binary))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured port and serve until the process exits
    pub async fn serve(self) -> crate::Result<()> {
        let addr = format!("0.0.0.0:{}", self.state.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Listener accepting connections on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

/// Serve the raw index document verbatim
async fn tracks_get_index(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    tracing::info!("/tracks/getIndex | {} | {}", method, uri.query().unwrap_or(""));

    let _params = match gate::check(&state.config, &method, &uri) {
        Ok(params) => params,
        Err(e) => return e.into_response(),
    };

    let result = stream::serve_file(&state.config.manifest_path, &headers).await;
    gate::apply_cors_headers(unwrap_response(result))
}

/// Resolve a TrackID and stream its file
async fn tracks_get_as_binary(
    State(state): State<GatewayState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    tracing::info!(
        "/tracks/getAsBinary | {} | {}",
        method,
        uri.query().unwrap_or("")
    );

    let params = match gate::check(&state.config, &method, &uri) {
        Ok(params) => params,
        Err(e) => return e.into_response(),
    };

    let result = serve_track(&state, params.get("TrackID"), &headers).await;
    gate::apply_cors_headers(unwrap_response(result))
}

async fn serve_track(
    state: &GatewayState,
    track_id: Option<&str>,
    headers: &HeaderMap,
) -> Result<Response, RequestError> {
    let path = resolve::resolve_track(&state.config, &state.manifest, track_id)?;
    stream::serve_file(Path::new(&path), headers).await
}

fn unwrap_response(result: Result<Response, RequestError>) -> Response {
    result.unwrap_or_else(|e| e.into_response())
}
