//! Synchronous client for the Buzzsprout podcast-hosting API.
//!
//! # Overview
//! Reads podcasts and episodes and creates episodes, either from a remote
//! audio URL or from uploaded file content. Every call is a single blocking
//! request/response exchange; nothing is cached and nothing is retried.
//!
//! # Design
//! - `BuzzsproutClient` holds an immutable `ClientConfig` and a `Transport`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit and the
//!   transport can be swapped out in tests.
//! - 404 on a single-resource lookup is `Ok(None)`; every other non-2xx is
//!   `ApiError::HttpError`.

pub mod client;
pub mod config;
pub mod error;
mod form;
pub mod http;
pub mod types;

pub use client::BuzzsproutClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Episode, FileUpload, NewEpisode, Podcast};
