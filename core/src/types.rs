//! Domain types for the Buzzsprout API.
//!
//! # Design
//! Response types keep whatever the server sends: no field beyond `id` is
//! required, and the rest is held as raw JSON so re-serializing a decoded
//! value gives back the server's object. `Episode` adds typed accessors on
//! top of that map. `NewEpisode` is the create-episode input: every
//! optional field defaults to `None` and is left off the wire when absent.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// A podcast (show) as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Podcast {
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A single episode as returned by the API.
///
/// Only `id` is required. Every other field stays in `fields` exactly as the
/// server sent it, nulls included; the accessors read a typed view of it and
/// return `None` when a field is absent, null, or not the expected shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Episode {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn title(&self) -> Option<&str> {
        self.text("title")
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.text("audio_url")
    }

    pub fn artwork_url(&self) -> Option<&str> {
        self.text("artwork_url")
    }

    pub fn description(&self) -> Option<&str> {
        self.text("description")
    }

    pub fn summary(&self) -> Option<&str> {
        self.text("summary")
    }

    pub fn artist(&self) -> Option<&str> {
        self.text("artist")
    }

    /// Comma-separated.
    pub fn tags(&self) -> Option<&str> {
        self.text("tags")
    }

    pub fn guid(&self) -> Option<&str> {
        self.text("guid")
    }

    pub fn published_at(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp("published_at")
    }

    pub fn inactive_at(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp("inactive_at")
    }

    /// Length in seconds.
    pub fn duration(&self) -> Option<u64> {
        self.number("duration")
    }

    pub fn episode_number(&self) -> Option<u64> {
        self.number("episode_number")
    }

    pub fn season_number(&self) -> Option<u64> {
        self.number("season_number")
    }

    /// Assigned by the server; never sent on create.
    pub fn total_plays(&self) -> Option<u64> {
        self.number("total_plays")
    }

    pub fn explicit(&self) -> Option<bool> {
        self.flag("explicit")
    }

    pub fn private(&self) -> Option<bool> {
        self.flag("private")
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Numbers may arrive as JSON numbers or numeric strings.
    fn number(&self, name: &str) -> Option<u64> {
        match self.fields.get(name)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn flag(&self, name: &str) -> Option<bool> {
        match self.fields.get(name)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    fn timestamp(&self, name: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.text(name)?).ok()
    }
}

/// Binary content attached to a multipart create-episode request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileUpload {
    /// Read from disk when the request is built.
    Path(PathBuf),
    /// Already in memory.
    Bytes { file_name: String, content: Vec<u8> },
}

impl FileUpload {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        FileUpload::Path(path.into())
    }

    pub fn from_bytes(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        FileUpload::Bytes {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Resolve to `(file_name, content)`. In-memory uploads are borrowed;
    /// path uploads are read in full and the file handle is released before
    /// this returns.
    pub(crate) fn load(&self) -> Result<(Cow<'_, str>, Cow<'_, [u8]>), ApiError> {
        match self {
            FileUpload::Path(path) => {
                let content = std::fs::read(path).map_err(|source| ApiError::FileReadError {
                    path: path.clone(),
                    source,
                })?;
                Ok((Cow::Owned(upload_name(path)), Cow::Owned(content)))
            }
            FileUpload::Bytes { file_name, content } => {
                Ok((Cow::Borrowed(file_name.as_str()), Cow::Borrowed(content.as_slice())))
            }
        }
    }
}

fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// Input for creating an episode.
///
/// Exactly one of `audio_url` / `audio_file` must be set, and at most one of
/// `artwork_url` / `artwork_file`. Deserializing covers the text fields only;
/// uploads are attached in code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewEpisode {
    pub title: String,
    pub audio_url: Option<String>,
    #[serde(skip)]
    pub audio_file: Option<FileUpload>,
    pub artwork_url: Option<String>,
    #[serde(skip)]
    pub artwork_file: Option<FileUpload>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub artist: Option<String>,
    /// Comma-separated.
    pub tags: Option<String>,
    pub published_at: Option<DateTime<FixedOffset>>,
    pub duration: Option<u64>,
    pub guid: Option<String>,
    pub episode_number: Option<u32>,
    pub season_number: Option<u32>,
    pub explicit: Option<bool>,
    pub private: Option<bool>,
}

impl NewEpisode {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Reject inputs whose media sources are missing or ambiguous.
    pub fn validate(&self) -> Result<(), ApiError> {
        match (&self.audio_url, &self.audio_file) {
            (None, None) => {
                return Err(ApiError::InvalidArgument(
                    "an audio source is required: set audio_url or audio_file".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ApiError::InvalidArgument(
                    "audio_url and audio_file are mutually exclusive".to_string(),
                ))
            }
            _ => {}
        }
        if self.artwork_url.is_some() && self.artwork_file.is_some() {
            return Err(ApiError::InvalidArgument(
                "artwork_url and artwork_file are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }

    /// True when the request has to go out as multipart form data.
    pub fn has_file_parts(&self) -> bool {
        self.audio_file.is_some() || self.artwork_file.is_some()
    }

    /// Text form fields in wire order. Absent fields are omitted.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("title", self.title.clone())];
        let mut push = |name: &'static str, value: Option<String>| {
            if let Some(value) = value {
                fields.push((name, value));
            }
        };
        push("audio_url", self.audio_url.clone());
        push("artwork_url", self.artwork_url.clone());
        push("description", self.description.clone());
        push("summary", self.summary.clone());
        push("artist", self.artist.clone());
        push("tags", self.tags.clone());
        push("published_at", self.published_at.map(|at| at.to_rfc3339()));
        push("duration", self.duration.map(|d| d.to_string()));
        push("guid", self.guid.clone());
        push("episode_number", self.episode_number.map(|n| n.to_string()));
        push("season_number", self.season_number.map(|n| n.to_string()));
        push("explicit", self.explicit.map(|b| b.to_string()));
        push("private", self.private.map(|b| b.to_string()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn podcast_keeps_unknown_fields() {
        let podcast: Podcast = serde_json::from_str(
            r#"{"id":7,"title":"Show","author":"Someone","explicit":false}"#,
        )
        .unwrap();
        assert_eq!(podcast.id, 7);
        assert_eq!(podcast.title(), Some("Show"));
        assert_eq!(podcast.field("author"), Some(&Value::from("Someone")));
        assert_eq!(podcast.field("explicit"), Some(&Value::Bool(false)));
        assert!(podcast.field("id").is_none());
    }

    #[test]
    fn podcast_without_title() {
        let podcast: Podcast = serde_json::from_str(r#"{"id":1}"#).unwrap();
        assert_eq!(podcast.title(), None);
    }

    #[test]
    fn episode_typed_view() {
        let episode: Episode = serde_json::from_str(
            r#"{
                "id": 42,
                "title": "Pilot",
                "audio_url": "https://x/y.mp3",
                "published_at": "2019-09-12T03:00:00.000-04:00",
                "duration": 1234,
                "episode_number": 1,
                "explicit": false,
                "total_plays": 99,
                "hq": true
            }"#,
        )
        .unwrap();
        assert_eq!(episode.id, 42);
        assert_eq!(episode.title(), Some("Pilot"));
        assert_eq!(episode.audio_url(), Some("https://x/y.mp3"));
        assert_eq!(
            episode.published_at().unwrap().to_rfc3339(),
            "2019-09-12T03:00:00-04:00"
        );
        assert_eq!(episode.duration(), Some(1234));
        assert_eq!(episode.episode_number(), Some(1));
        assert_eq!(episode.total_plays(), Some(99));
        assert_eq!(episode.explicit(), Some(false));
        assert!(episode.private().is_none());
        assert_eq!(episode.field("hq"), Some(&Value::Bool(true)));
    }

    #[test]
    fn episode_without_title_decodes() {
        let episode: Episode =
            serde_json::from_str(r#"{"id":5,"audio_url":"https://x/y.mp3"}"#).unwrap();
        assert_eq!(episode.id, 5);
        assert_eq!(episode.title(), None);
        assert_eq!(episode.audio_url(), Some("https://x/y.mp3"));
    }

    #[test]
    fn episode_tolerates_loosely_typed_fields() {
        let episode: Episode = serde_json::from_str(
            r#"{"id":1,"duration":"1234","private":"true","explicit":"maybe","published_at":"last week","season_number":null}"#,
        )
        .unwrap();
        assert_eq!(episode.duration(), Some(1234));
        assert_eq!(episode.private(), Some(true));
        assert_eq!(episode.explicit(), None);
        assert_eq!(episode.published_at(), None);
        assert_eq!(episode.season_number(), None);
        assert_eq!(episode.field("published_at"), Some(&Value::from("last week")));
    }

    #[test]
    fn episode_reserializes_exactly() {
        let original: Value = serde_json::from_str(
            r#"{
                "id": 1,
                "title": "T",
                "artwork_url": null,
                "inactive_at": null,
                "published_at": "2019-09-12T03:00:00.000-04:00",
                "duration": "1234",
                "tags": ""
            }"#,
        )
        .unwrap();
        let episode: Episode = serde_json::from_value(original.clone()).unwrap();
        assert!(episode.artwork_url().is_none());
        assert!(episode.inactive_at().is_none());
        assert_eq!(serde_json::to_value(&episode).unwrap(), original);
    }

    #[test]
    fn episode_requires_integer_id() {
        let result: Result<Episode, _> = serde_json::from_str(r#"{"title":"no id"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_missing_audio() {
        let episode = NewEpisode {
            artist: Some("A".to_string()),
            artwork_url: Some("https://x/a.png".to_string()),
            ..NewEpisode::new("T")
        };
        assert!(matches!(
            episode.validate(),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn validate_rejects_both_audio_sources() {
        let episode = NewEpisode {
            audio_url: Some("https://x/y.mp3".to_string()),
            audio_file: Some(FileUpload::from_bytes("y.mp3", b"ID3".to_vec())),
            ..NewEpisode::new("T")
        };
        assert!(matches!(
            episode.validate(),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn validate_rejects_both_artwork_sources() {
        let episode = NewEpisode {
            audio_url: Some("https://x/y.mp3".to_string()),
            artwork_url: Some("https://x/a.png".to_string()),
            artwork_file: Some(FileUpload::from_bytes("a.png", vec![0x89])),
            ..NewEpisode::new("T")
        };
        assert!(matches!(
            episode.validate(),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn validate_accepts_single_audio_source() {
        let by_url = NewEpisode {
            audio_url: Some("https://x/y.mp3".to_string()),
            ..NewEpisode::new("T")
        };
        assert!(by_url.validate().is_ok());
        assert!(!by_url.has_file_parts());

        let by_file = NewEpisode {
            audio_file: Some(FileUpload::from_bytes("y.mp3", b"ID3".to_vec())),
            ..NewEpisode::new("T")
        };
        assert!(by_file.validate().is_ok());
        assert!(by_file.has_file_parts());
    }

    #[test]
    fn form_fields_omit_absent_values() {
        let episode = NewEpisode {
            audio_url: Some("https://x/y.mp3".to_string()),
            duration: Some(321),
            explicit: Some(true),
            private: Some(false),
            published_at: Some(DateTime::parse_from_rfc3339("2024-05-01T09:30:00+02:00").unwrap()),
            ..NewEpisode::new("T")
        };
        assert_eq!(
            episode.form_fields(),
            vec![
                ("title", "T".to_string()),
                ("audio_url", "https://x/y.mp3".to_string()),
                ("published_at", "2024-05-01T09:30:00+02:00".to_string()),
                ("duration", "321".to_string()),
                ("explicit", "true".to_string()),
                ("private", "false".to_string()),
            ]
        );
    }

    #[test]
    fn path_upload_reads_file_name_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.mp3");
        std::fs::write(&path, b"audio bytes").unwrap();

        let upload = FileUpload::from_path(&path);
        let (name, content) = upload.load().unwrap();
        assert_eq!(name, "episode.mp3");
        assert_eq!(&*content, b"audio bytes");
    }

    #[test]
    fn in_memory_upload_is_borrowed() {
        let upload = FileUpload::from_bytes("y.mp3", b"ID3".to_vec());
        let (name, content) = upload.load().unwrap();
        assert!(matches!(name, Cow::Borrowed("y.mp3")));
        assert!(matches!(content, Cow::Borrowed(b) if b == b"ID3"));
    }

    #[test]
    fn missing_path_upload_is_a_file_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileUpload::from_path(dir.path().join("nope.mp3"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ApiError::FileReadError { .. }));
    }
}
