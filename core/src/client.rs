//! Buzzsprout API client: request builders, response parsers, and the
//! operations that join them through a `Transport`.
//!
//! # Design
//! `BuzzsproutClient` owns an immutable `ClientConfig` and a transport. Each
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`; the high-level
//! method (`list_podcasts`, `get_episode`, ...) sends the built request
//! exactly once and parses whatever comes back. There are no retries.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::form::{self, Multipart};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::types::{Episode, NewEpisode, Podcast};

/// Synchronous client for the Buzzsprout REST API.
#[derive(Debug, Clone)]
pub struct BuzzsproutClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl BuzzsproutClient<UreqTransport> {
    /// Client for the production API with the default transport.
    pub fn new(api_key: &str) -> Self {
        Self::from_config(ClientConfig::new(api_key))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::with_timeout(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T> BuzzsproutClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_list_podcasts(&self) -> HttpRequest {
        self.get("/podcasts.json".to_string())
    }

    pub fn build_get_podcast(&self, podcast_id: u64) -> HttpRequest {
        self.get(format!("/podcasts/{podcast_id}.json"))
    }

    pub fn build_list_episodes(&self, podcast_id: u64) -> HttpRequest {
        self.get(format!("/{podcast_id}/episodes.json"))
    }

    pub fn build_get_episode(&self, podcast_id: u64, episode_id: u64) -> HttpRequest {
        self.get(format!("/{podcast_id}/episodes/{episode_id}.json"))
    }

    /// Validates `episode` and encodes it as a form body. Uses multipart
    /// when a file part is present, urlencoded otherwise.
    pub fn build_create_episode(
        &self,
        podcast_id: u64,
        episode: &NewEpisode,
    ) -> Result<HttpRequest, ApiError> {
        if let Err(err) = episode.validate() {
            tracing::debug!(podcast_id, error = %err, "rejected create-episode input");
            return Err(err);
        }

        let fields = episode.form_fields();
        let (content_type, body) = if episode.has_file_parts() {
            let mut multipart = Multipart::new();
            for (name, value) in &fields {
                multipart.text(name, value);
            }
            if let Some(upload) = &episode.audio_file {
                let (file_name, content) = upload.load()?;
                multipart.file("audio_file", &file_name, &content);
            }
            if let Some(upload) = &episode.artwork_file {
                let (file_name, content) = upload.load()?;
                multipart.file("artwork_file", &file_name, &content);
            }
            multipart.finish()
        } else {
            (form::URLENCODED.to_string(), form::urlencoded(&fields))
        };

        let mut headers = self.default_headers();
        headers.push(("content-type".to_string(), content_type));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.url(&format!("/{podcast_id}/episodes.json")),
            headers,
            body: Some(body),
        })
    }

    pub fn parse_list_podcasts(&self, response: HttpResponse) -> Result<Vec<Podcast>, ApiError> {
        decode(response)
    }

    /// `Ok(None)` when the server answers 404.
    pub fn parse_get_podcast(&self, response: HttpResponse) -> Result<Option<Podcast>, ApiError> {
        decode_optional(response)
    }

    pub fn parse_list_episodes(&self, response: HttpResponse) -> Result<Vec<Episode>, ApiError> {
        decode(response)
    }

    /// `Ok(None)` when the server answers 404.
    pub fn parse_get_episode(&self, response: HttpResponse) -> Result<Option<Episode>, ApiError> {
        decode_optional(response)
    }

    pub fn parse_create_episode(&self, response: HttpResponse) -> Result<Episode, ApiError> {
        decode(response)
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.url(&path),
            headers: self.default_headers(),
            body: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    fn default_headers(&self) -> Vec<(String, String)> {
        vec![
            ("authorization".to_string(), self.config.authorization()),
            ("accept".to_string(), "application/json".to_string()),
        ]
    }
}

impl<T: Transport> BuzzsproutClient<T> {
    pub fn list_podcasts(&self) -> Result<Vec<Podcast>, ApiError> {
        let response = self.send(self.build_list_podcasts())?;
        self.parse_list_podcasts(response)
    }

    pub fn get_podcast(&self, podcast_id: u64) -> Result<Option<Podcast>, ApiError> {
        let response = self.send(self.build_get_podcast(podcast_id))?;
        self.parse_get_podcast(response)
    }

    pub fn list_episodes(&self, podcast_id: u64) -> Result<Vec<Episode>, ApiError> {
        let response = self.send(self.build_list_episodes(podcast_id))?;
        self.parse_list_episodes(response)
    }

    pub fn get_episode(&self, podcast_id: u64, episode_id: u64) -> Result<Option<Episode>, ApiError> {
        let response = self.send(self.build_get_episode(podcast_id, episode_id))?;
        self.parse_get_episode(response)
    }

    pub fn create_episode(&self, podcast_id: u64, episode: &NewEpisode) -> Result<Episode, ApiError> {
        let request = self.build_create_episode(podcast_id, episode)?;
        let response = self.send(request)?;
        self.parse_create_episode(response)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let url = request.url.clone();
        tracing::debug!(method, url = %url, "sending request");
        let response = self.transport.execute(request)?;
        tracing::debug!(method, url = %url, status = response.status, "received response");
        Ok(response)
    }
}

/// Map a non-2xx status to `HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<D: DeserializeOwned>(response: HttpResponse) -> Result<D, ApiError> {
    check_status(&response)?;
    Ok(serde_json::from_str(&response.body)?)
}

fn decode_optional<D: DeserializeOwned>(response: HttpResponse) -> Result<Option<D>, ApiError> {
    if response.status == 404 {
        return Ok(None);
    }
    decode(response).map(Some)
}
