//! Error types for the Buzzsprout API client.
//!
//! # Design
//! A 404 on a single-resource lookup is not an error: `get_podcast` and
//! `get_episode` return `Ok(None)` for it. Everything else that is not a
//! 2xx lands in `HttpError` with the raw status code and body. Argument
//! problems are caught before any request leaves the process and get their
//! own variant so callers can tell "you called this wrong" apart from "the
//! server said no".

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by `BuzzsproutClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The call was rejected before any network activity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server returned a non-2xx status that has no dedicated meaning.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("transport error: {0}")]
    TransportError(#[from] ureq::Error),

    /// An upload file could not be read from disk.
    #[error("failed to read upload {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A success response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
