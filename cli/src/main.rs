mod cli;

use anyhow::{bail, Context, Result};
use buzzsprout_core::BuzzsproutClient;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = BuzzsproutClient::from_config(cli.client_config());
    tracing::debug!(config = ?client.config(), "client ready");

    match &cli.command {
        Commands::Podcasts => print_json(&client.list_podcasts()?),
        Commands::Podcast { podcast_id } => match client.get_podcast(*podcast_id)? {
            Some(podcast) => print_json(&podcast),
            None => bail!("podcast {podcast_id} not found"),
        },
        Commands::Episodes { podcast_id } => print_json(&client.list_episodes(*podcast_id)?),
        Commands::Episode {
            podcast_id,
            episode_id,
        } => match client.get_episode(*podcast_id, *episode_id)? {
            Some(episode) => print_json(&episode),
            None => bail!("episode {episode_id} of podcast {podcast_id} not found"),
        },
        Commands::CreateEpisode(args) => {
            let episode = client
                .create_episode(args.podcast_id, &args.to_new_episode())
                .with_context(|| format!("creating episode on podcast {}", args.podcast_id))?;
            tracing::info!(id = episode.id, "episode created");
            print_json(&episode)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
