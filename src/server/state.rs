use axum::extract::FromRef;

use crate::alarms::AlarmEngine;
use crate::catalog_store::CatalogStore;
use crate::pipeline::FramePipeline;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedFramePipeline = Arc<FramePipeline>;
pub type GuardedAlarmEngine = Arc<AlarmEngine>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub pipeline: GuardedFramePipeline,
    pub alarms: GuardedAlarmEngine,
    pub version: String,
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedFramePipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.pipeline.clone()
    }
}

impl FromRef<ServerState> for GuardedAlarmEngine {
    fn from_ref(input: &ServerState) -> Self {
        input.alarms.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
