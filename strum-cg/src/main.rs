//! strum-cg - Chart Generator service
//!
//! Generates chord charts, fretboard diagrams and accompaniment advice for
//! songs via a generative-model collaborator, fronted by a content-addressed
//! SQLite cache so each (song, arrangement style) pair is generated once.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use strum_cg::services::{
    AdminGate, DbSessionResolver, GeminiClient, GenerationOrchestrator, SpotifyClient,
    YouTubeClient,
};
use strum_cg::AppState;
use strum_common::config::{
    self, load_toml_config, resolve_root_folder, resolve_setting, TomlConfig,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "strum-cg", about = "STRUM chart generator service")]
struct Args {
    /// Root data folder (overrides STRUM_ROOT_FOLDER and TOML)
    #[arg(long)]
    root_folder: Option<String>,

    /// Configuration file path (default: ~/.config/strum/strum.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen port
    #[arg(long, default_value_t = 5741)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config loads before tracing so the log filter can come from TOML
    let config_path = args.config.clone().or_else(config::default_config_path);
    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(toml_config.log_filter.clone().unwrap_or_else(|| "info".to_string()))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting strum-cg (Chart Generator) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = config::database_path(&root_folder)?;
    info!("Database: {}", db_path.display());

    let db = strum_cg::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Credentials resolve ENV over TOML
    let spotify_client_id = resolve_setting(
        "STRUM_SPOTIFY_CLIENT_ID",
        toml_config.spotify_client_id.as_deref(),
    )
    .ok_or_else(|| anyhow!("Spotify client id not configured (STRUM_SPOTIFY_CLIENT_ID)"))?;
    let spotify_client_secret = resolve_setting(
        "STRUM_SPOTIFY_CLIENT_SECRET",
        toml_config.spotify_client_secret.as_deref(),
    )
    .ok_or_else(|| anyhow!("Spotify client secret not configured (STRUM_SPOTIFY_CLIENT_SECRET)"))?;
    let gemini_api_key = resolve_setting(
        "STRUM_GEMINI_API_KEY",
        toml_config.gemini_api_key.as_deref(),
    )
    .ok_or_else(|| anyhow!("Gemini API key not configured (STRUM_GEMINI_API_KEY)"))?;

    let spotify = Arc::new(
        SpotifyClient::new(spotify_client_id, spotify_client_secret)
            .map_err(|e| anyhow!("Failed to create Spotify client: {}", e))?,
    );
    let gemini = Arc::new(
        GeminiClient::new(gemini_api_key)
            .map_err(|e| anyhow!("Failed to create Gemini client: {}", e))?,
    );

    let video_search = match resolve_setting(
        "STRUM_YOUTUBE_API_KEY",
        toml_config.youtube_api_key.as_deref(),
    ) {
        Some(key) => Some(Arc::new(
            YouTubeClient::new(key)
                .map_err(|e| anyhow!("Failed to create YouTube client: {}", e))?,
        )),
        None => {
            warn!("YouTube API key not configured; video lookup disabled");
            None
        }
    };

    let admin_emails = match std::env::var("STRUM_ADMIN_EMAILS") {
        Ok(emails) if !emails.trim().is_empty() => emails
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect(),
        _ => toml_config.admin_emails.clone(),
    };
    if admin_emails.is_empty() {
        warn!("No admin emails configured; force-regenerate and delete are disabled");
    }

    let admin_gate = AdminGate::new(Arc::new(DbSessionResolver::new(db.clone())), admin_emails);
    let orchestrator = Arc::new(GenerationOrchestrator::new(
        db.clone(),
        gemini.clone(),
        gemini.clone(),
        gemini,
        spotify.clone(),
        admin_gate,
    ));

    let state = AppState::new(db, orchestrator, spotify, video_search);
    let app = strum_cg::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
