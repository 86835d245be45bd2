//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database.

use super::constants::*;
use super::fakes::{ScriptedClassifier, StubResolver};
use super::fixtures::create_test_catalog;
use emotune_server::alarms::AlarmEngine;
use emotune_server::catalog_store::SqliteCatalogStore;
use emotune_server::pipeline::FramePipeline;
use emotune_server::recommendation::RecommendationEngine;
use emotune_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use emotune_server::Emotion;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Test server instance with an isolated database
///
/// When dropped, the server and its pending alarms are shut down and the
/// temp directory is cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Catalog store for direct database access in tests
    pub catalog_store: Arc<SqliteCatalogStore>,

    /// Classifier used by the frame pipeline, scripted by the test
    pub classifier: Arc<ScriptedClassifier>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Spawns a server over the default catalog on a random port
    pub async fn spawn() -> Self {
        Self::spawn_with_catalog(true).await
    }

    /// Spawns a server whose catalog has no songs
    #[allow(dead_code)]
    pub async fn spawn_empty() -> Self {
        Self::spawn_with_catalog(false).await
    }

    async fn spawn_with_catalog(with_songs: bool) -> Self {
        let (temp_db_dir, db_path) =
            create_test_catalog(with_songs).expect("Failed to create test catalog");
        let catalog_store =
            Arc::new(SqliteCatalogStore::new(&db_path).expect("Failed to open catalog store"));
        let classifier = Arc::new(ScriptedClassifier::new(Some(Emotion::Neutral)));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let shutdown = CancellationToken::new();
        let recommender = RecommendationEngine::new(catalog_store.clone(), Arc::new(StubResolver));
        let pipeline = FramePipeline::new(
            classifier.clone(),
            catalog_store.clone(),
            recommender.clone(),
        );
        let state = ServerState {
            config: ServerConfig {
                requests_logging_level: RequestsLoggingLevel::None,
                port,
                metrics_port: 0,
                frontend_dir_path: None,
                midi_output_dir: None,
            },
            start_time: Instant::now(),
            catalog_store: catalog_store.clone(),
            pipeline: Arc::new(pipeline),
            alarms: Arc::new(AlarmEngine::new(recommender, shutdown.clone())),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        let app = make_app(state);

        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(server_shutdown.cancelled_owned())
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            catalog_store,
            classifier,
            _temp_db_dir: temp_db_dir,
            shutdown,
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
