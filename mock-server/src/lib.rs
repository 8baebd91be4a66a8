use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

/// The only key the mock accepts.
pub const API_KEY: &str = "mock-api-key";

/// Host that synthesized upload URLs point at.
pub const UPLOAD_HOST: &str = "https://mock.buzzsprout.test/uploads";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Podcast {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub website_address: Option<String>,
    pub contact_email: Option<String>,
    pub explicit: bool,
    pub language: String,
    pub timezone: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub title: String,
    pub audio_url: String,
    pub artwork_url: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub artist: Option<String>,
    pub tags: Option<String>,
    pub published_at: Option<String>,
    pub duration: Option<u64>,
    pub guid: String,
    pub inactive_at: Option<String>,
    pub episode_number: Option<u32>,
    pub season_number: Option<u32>,
    pub explicit: bool,
    pub private: bool,
    pub total_plays: u64,
    /// Size of the uploaded audio file, when the episode was created from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_upload_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artwork_upload_bytes: Option<usize>,
}

#[derive(Debug)]
pub struct Store {
    pub podcasts: Vec<Podcast>,
    pub episodes: HashMap<u64, Vec<Episode>>,
    next_episode_id: u64,
}

impl Store {
    /// Two podcasts, no episodes.
    pub fn seeded() -> Self {
        let podcasts = vec![
            Podcast {
                id: 12345,
                title: "Mock Show".to_string(),
                author: "Mock Author".to_string(),
                description: "A podcast served by the mock server".to_string(),
                website_address: Some("https://mock.example".to_string()),
                contact_email: Some("host@mock.example".to_string()),
                explicit: false,
                language: "en-us".to_string(),
                timezone: "UTC".to_string(),
            },
            Podcast {
                id: 67890,
                title: "Second Show".to_string(),
                author: "Another Author".to_string(),
                description: "Nothing to see here".to_string(),
                website_address: None,
                contact_email: None,
                explicit: true,
                language: "de".to_string(),
                timezone: "Europe/Berlin".to_string(),
            },
        ];
        let episodes = podcasts.iter().map(|p| (p.id, Vec::new())).collect();
        Self {
            podcasts,
            episodes,
            next_episode_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    let api = Router::new()
        .route("/podcasts.json", get(list_podcasts))
        .route("/podcasts/{file}", get(get_podcast))
        .route(
            "/{podcast_id}/episodes.json",
            get(list_episodes).post(create_episode),
        )
        .route("/{podcast_id}/episodes/{file}", get(get_episode))
        .layer(middleware::from_fn(require_token))
        .with_state(db);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(request: Request, next: Next) -> Response {
    let expected = format!("Token token={API_KEY}");
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Access denied" })),
        )
            .into_response();
    }
    next.run(request).await
}

/// `"12345.json"` -> `12345`.
fn json_id(file: &str) -> Option<u64> {
    file.strip_suffix(".json")?.parse().ok()
}

async fn list_podcasts(State(db): State<Db>) -> Json<Vec<Podcast>> {
    Json(db.read().await.podcasts.clone())
}

async fn get_podcast(
    State(db): State<Db>,
    Path(file): Path<String>,
) -> Result<Json<Podcast>, StatusCode> {
    let id = json_id(&file).ok_or(StatusCode::NOT_FOUND)?;
    let store = db.read().await;
    store
        .podcasts
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_episodes(
    State(db): State<Db>,
    Path(podcast_id): Path<u64>,
) -> Result<Json<Vec<Episode>>, StatusCode> {
    let store = db.read().await;
    store
        .episodes
        .get(&podcast_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_episode(
    State(db): State<Db>,
    Path((podcast_id, file)): Path<(u64, String)>,
) -> Result<Json<Episode>, StatusCode> {
    let id = json_id(&file).ok_or(StatusCode::NOT_FOUND)?;
    let store = db.read().await;
    store
        .episodes
        .get(&podcast_id)
        .and_then(|episodes| episodes.iter().find(|e| e.id == id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Fields of a create-episode body, from either encoding.
#[derive(Debug, Default)]
struct EpisodeForm {
    fields: HashMap<String, String>,
    audio_file: Option<(String, usize)>,
    artwork_file: Option<(String, usize)>,
}

impl EpisodeForm {
    async fn from_request(request: Request) -> Result<Self, Response> {
        let is_multipart = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self {
                fields,
                ..Self::default()
            });
        }

        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            match (name.as_str(), file_name) {
                ("audio_file", Some(file_name)) => {
                    let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                    form.audio_file = Some((file_name, bytes.len()));
                }
                ("artwork_file", Some(file_name)) => {
                    let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                    form.artwork_file = Some((file_name, bytes.len()));
                }
                _ => {
                    let value = field.text().await.map_err(IntoResponse::into_response)?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn number<N: std::str::FromStr>(&self, name: &str) -> Option<N> {
        self.fields.get(name).and_then(|v| v.parse().ok())
    }

    fn flag(&self, name: &str) -> bool {
        matches!(self.fields.get(name).map(String::as_str), Some("true" | "1"))
    }
}

fn unprocessable(field: &str, message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ field: [message] })),
    )
        .into_response()
}

async fn create_episode(
    State(db): State<Db>,
    Path(podcast_id): Path<u64>,
    request: Request,
) -> Result<(StatusCode, Json<Episode>), Response> {
    if !db.read().await.episodes.contains_key(&podcast_id) {
        return Err(StatusCode::NOT_FOUND.into_response());
    }

    let form = EpisodeForm::from_request(request).await?;
    let title = form
        .text("title")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unprocessable("title", "can't be blank"))?;
    let audio_url = match (form.text("audio_url"), &form.audio_file) {
        (Some(url), None) => url,
        (None, Some((file_name, _))) => format!("{UPLOAD_HOST}/{file_name}"),
        (Some(_), Some(_)) => return Err(unprocessable("audio", "give either a URL or a file")),
        (None, None) => return Err(unprocessable("audio", "can't be blank")),
    };
    let artwork_url = form.text("artwork_url").or_else(|| {
        form.artwork_file
            .as_ref()
            .map(|(file_name, _)| format!("{UPLOAD_HOST}/{file_name}"))
    });

    let mut store = db.write().await;
    let id = store.next_episode_id;
    store.next_episode_id += 1;
    let episode = Episode {
        id,
        title,
        audio_url,
        artwork_url,
        description: form.text("description"),
        summary: form.text("summary"),
        artist: form.text("artist"),
        tags: form.text("tags"),
        published_at: form.text("published_at"),
        duration: form.number("duration"),
        guid: form
            .text("guid")
            .unwrap_or_else(|| format!("mock-{podcast_id}-{id}")),
        inactive_at: None,
        episode_number: form.number("episode_number"),
        season_number: form.number("season_number"),
        explicit: form.flag("explicit"),
        private: form.flag("private"),
        total_plays: 0,
        audio_upload_bytes: form.audio_file.as_ref().map(|(_, len)| *len),
        artwork_upload_bytes: form.artwork_file.as_ref().map(|(_, len)| *len),
    };
    store
        .episodes
        .entry(podcast_id)
        .or_default()
        .push(episode.clone());
    Ok((StatusCode::CREATED, Json(episode)))
}
