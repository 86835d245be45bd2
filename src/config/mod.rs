mod file_config;

pub use file_config::{ClassifierConfig, FileConfig, VideoConfig};

use crate::server::RequestsLoggingLevel;
use crate::video::DEFAULT_SEARCH_URL;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "emotune.db";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub classifier_url: Option<String>,
    pub classifier_timeout_sec: u64,
    pub youtube_api_key: Option<String>,
    pub video_search_url: Option<String>,
    pub resolver_timeout_sec: u64,
    pub seed_catalog: Option<PathBuf>,
    pub midi_output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSettings {
    pub url: Option<String>,
    pub timeout_sec: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoSettings {
    pub youtube_api_key: Option<String>,
    pub search_url: String,
    pub timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub seed_catalog: Option<PathBuf>,
    pub midi_output_dir: Option<PathBuf>,
    pub classifier: ClassifierSettings,
    pub video: VideoSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;
        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let classifier_file = file.classifier.unwrap_or_default();
        let classifier = ClassifierSettings {
            url: classifier_file.url.or_else(|| cli.classifier_url.clone()),
            timeout_sec: classifier_file
                .timeout_sec
                .unwrap_or(cli.classifier_timeout_sec),
        };

        let video_file = file.video.unwrap_or_default();
        let video = VideoSettings {
            youtube_api_key: video_file
                .youtube_api_key
                .or_else(|| cli.youtube_api_key.clone()),
            search_url: video_file
                .search_url
                .or_else(|| cli.video_search_url.clone())
                .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
            timeout_sec: video_file.timeout_sec.unwrap_or(cli.resolver_timeout_sec),
        };

        Ok(AppConfig {
            db_dir,
            port: file.port.unwrap_or(cli.port),
            metrics_port: file.metrics_port.unwrap_or(cli.metrics_port),
            logging_level,
            frontend_dir_path: file
                .frontend_dir_path
                .or_else(|| cli.frontend_dir_path.clone()),
            seed_catalog: file
                .seed_catalog
                .map(PathBuf::from)
                .or_else(|| cli.seed_catalog.clone()),
            midi_output_dir: file
                .midi_output_dir
                .map(PathBuf::from)
                .or_else(|| cli.midi_output_dir.clone()),
            classifier,
            video,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join(DB_FILE_NAME)
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
