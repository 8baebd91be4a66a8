use std::path::PathBuf;
use std::time::Duration;

use buzzsprout_core::{ClientConfig, FileUpload, NewEpisode, DEFAULT_BASE_URL};
use chrono::{DateTime, FixedOffset};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Command-line access to the Buzzsprout API", long_about = None)]
pub struct Cli {
    /// Your Buzzsprout API token
    #[arg(long, env = "BUZZSPROUT_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// API root to talk to
    #[arg(long, env = "BUZZSPROUT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Give up on a request after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all podcasts on the account
    Podcasts,
    /// Show a single podcast
    Podcast { podcast_id: u64 },
    /// List the episodes of a podcast
    Episodes { podcast_id: u64 },
    /// Show a single episode
    Episode { podcast_id: u64, episode_id: u64 },
    /// Create an episode from a remote audio URL or a local audio file
    CreateEpisode(CreateEpisodeArgs),
}

#[derive(Args, Debug)]
pub struct CreateEpisodeArgs {
    pub podcast_id: u64,

    #[arg(long)]
    pub title: String,

    /// Remote audio the server should fetch
    #[arg(long, conflicts_with = "audio_file")]
    pub audio_url: Option<String>,

    /// Local audio file to upload
    #[arg(long)]
    pub audio_file: Option<PathBuf>,

    #[arg(long, conflicts_with = "artwork_file")]
    pub artwork_url: Option<String>,

    #[arg(long)]
    pub artwork_file: Option<PathBuf>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,

    #[arg(long)]
    pub artist: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Publish time, RFC 3339 (e.g. 2024-06-01T18:00:00-05:00)
    #[arg(long)]
    pub published_at: Option<DateTime<FixedOffset>>,

    /// Length in seconds
    #[arg(long)]
    pub duration: Option<u64>,

    #[arg(long)]
    pub guid: Option<String>,

    #[arg(long)]
    pub episode_number: Option<u32>,

    #[arg(long)]
    pub season_number: Option<u32>,

    /// Mark as explicit; `--explicit=false` sends an explicit `false`
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub explicit: Option<bool>,

    /// Hide from the public feed; `--private=false` sends an explicit `false`
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub private: Option<bool>,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_key).with_base_url(&self.base_url);
        match self.timeout {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

impl CreateEpisodeArgs {
    /// Flags that were not passed stay unset instead of being sent.
    pub fn to_new_episode(&self) -> NewEpisode {
        NewEpisode {
            title: self.title.clone(),
            audio_url: self.audio_url.clone(),
            audio_file: self.audio_file.clone().map(FileUpload::from_path),
            artwork_url: self.artwork_url.clone(),
            artwork_file: self.artwork_file.clone().map(FileUpload::from_path),
            description: self.description.clone(),
            summary: self.summary.clone(),
            artist: self.artist.clone(),
            tags: self.tags.clone(),
            published_at: self.published_at,
            duration: self.duration,
            guid: self.guid.clone(),
            episode_number: self.episode_number,
            season_number: self.season_number,
            explicit: self.explicit,
            private: self.private,
        }
    }
}
