//! HTTP gateway for manifest-indexed track files
//!
//! This crate provides the HTTP server that exposes a music library over
//! two endpoints: the raw track index and individual track files. Every
//! request passes a shared gate (query parsing, method allow-list, token
//! authentication, CORS) before any endpoint logic runs, and files are
//! streamed with byte-range support so browser audio players can seek.

pub mod config;
pub mod error;
pub mod gate;
pub mod resolve;
pub mod server;
pub mod stream;

pub use config::{Config, ConfigError};
pub use error::RequestError;
pub use server::{GatewayApi, GatewayState};

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
