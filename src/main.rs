use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::{Duration, Instant};
use std::{fmt::Debug, path::PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use emotune_server::alarms::AlarmEngine;
use emotune_server::catalog_store::{load_seed_if_empty, CatalogStore, SqliteCatalogStore};
use emotune_server::classifier::{DeepFaceClassifier, EmotionClassifier, UnavailableClassifier};
use emotune_server::config;
use emotune_server::pipeline::FramePipeline;
use emotune_server::recommendation::RecommendationEngine;
use emotune_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig, ServerState};
use emotune_server::video::{UnavailableResolver, VideoLinkResolver, YouTubeResolver};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

fn parse_dir(s: &str) -> Result<PathBuf, String> {
    let path = parse_path(s)?;
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", s));
    }
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", s));
    }
    Ok(path)
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory containing the emotune.db database file.
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_dir)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 4000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Base URL of the DeepFace-compatible emotion classifier service.
    #[clap(long)]
    pub classifier_url: Option<String>,

    /// Timeout in seconds for classifier requests.
    #[clap(long, default_value_t = 30)]
    pub classifier_timeout_sec: u64,

    /// API key for the YouTube Data API.
    #[clap(long, env = "YOUTUBE_API_KEY")]
    pub youtube_api_key: Option<String>,

    /// Override for the video search endpoint.
    #[clap(long)]
    pub video_search_url: Option<String>,

    /// Timeout in seconds for video search requests.
    #[clap(long, default_value_t = 10)]
    pub resolver_timeout_sec: u64,

    /// JSON file with songs loaded into an empty catalog at startup.
    #[clap(long, value_parser = parse_path)]
    pub seed_catalog: Option<PathBuf>,

    /// Directory where generated MIDI files are also saved.
    #[clap(long, value_parser = parse_dir)]
    pub midi_output_dir: Option<PathBuf>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            classifier_url: args.classifier_url.clone(),
            classifier_timeout_sec: args.classifier_timeout_sec,
            youtube_api_key: args.youtube_api_key.clone(),
            video_search_url: args.video_search_url.clone(),
            resolver_timeout_sec: args.resolver_timeout_sec,
            seed_catalog: args.seed_catalog.clone(),
            midi_output_dir: args.midi_output_dir.clone(),
        }
    }
}

fn make_classifier(settings: &config::ClassifierSettings) -> Result<Arc<dyn EmotionClassifier>> {
    match &settings.url {
        Some(url) => {
            info!("Using emotion classifier at {}", url);
            let timeout = Duration::from_secs(settings.timeout_sec);
            Ok(Arc::new(DeepFaceClassifier::new(url.clone(), timeout)?))
        }
        None => {
            warn!("No classifier URL configured, frame analysis will fail");
            Ok(Arc::new(UnavailableClassifier))
        }
    }
}

fn make_resolver(settings: &config::VideoSettings) -> Result<Arc<dyn VideoLinkResolver>> {
    match &settings.youtube_api_key {
        Some(api_key) => {
            let timeout = Duration::from_secs(settings.timeout_sec);
            Ok(Arc::new(YouTubeResolver::new(
                settings.search_url.clone(),
                api_key.clone(),
                timeout,
            )?))
        }
        None => {
            warn!("No YouTube API key configured, recommendations will have no link");
            Ok(Arc::new(UnavailableResolver))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = config::AppConfig::resolve(&(&cli_args).into(), file_config)?;

    let db_path = app_config.db_path();
    info!("Opening SQLite catalog database at {:?}...", db_path);
    let catalog_store = Arc::new(SqliteCatalogStore::new(&db_path)?);

    if let Some(seed_path) = &app_config.seed_catalog {
        let loaded = load_seed_if_empty(catalog_store.as_ref(), seed_path)?;
        if loaded > 0 {
            info!("Seeded catalog with {} songs from {:?}", loaded, seed_path);
        }
    }

    info!("Initializing metrics...");
    metrics::init_metrics();
    metrics::set_catalog_songs(catalog_store.count_songs()?);

    let classifier = make_classifier(&app_config.classifier)?;
    let resolver = make_resolver(&app_config.video)?;

    let shutdown_token = CancellationToken::new();
    let recommender = RecommendationEngine::new(catalog_store.clone(), resolver);
    let pipeline = FramePipeline::new(classifier, catalog_store.clone(), recommender.clone());
    let alarms = AlarmEngine::new(recommender, shutdown_token.clone());

    let state = ServerState {
        config: ServerConfig {
            requests_logging_level: app_config.logging_level.clone(),
            port: app_config.port,
            metrics_port: app_config.metrics_port,
            frontend_dir_path: app_config.frontend_dir_path.clone(),
            midi_output_dir: app_config.midi_output_dir.clone(),
        },
        start_time: Instant::now(),
        catalog_store,
        pipeline: Arc::new(pipeline),
        alarms: Arc::new(alarms),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);

    tokio::select! {
        result = run_server(state, shutdown_token.clone()) => {
            info!("HTTP server stopped: {:?}", result);
            shutdown_token.cancel();
            result
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown");
            shutdown_token.cancel();
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(())
        }
    }
}
