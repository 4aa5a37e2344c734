use axum::extract::FromRef;

use crate::record_store::RecordStore;
use std::sync::Arc;

use super::ServerConfig;

pub type GuardedRecordStore = Arc<dyn RecordStore>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub record_store: GuardedRecordStore,
}

impl FromRef<ServerState> for GuardedRecordStore {
    fn from_ref(input: &ServerState) -> Self {
        input.record_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
