//! Track index data model
//!
//! This crate loads the JSON track index written by the library scanner
//! and exposes it as a read-only mapping from TrackID to file location.
//! The index is loaded once at startup and never mutated afterwards, so
//! it can be shared between request handlers without locking.

pub mod store;

pub use store::{Manifest, ManifestEntry, ManifestError};
