use std::sync::Arc;

use tokio::net::TcpListener;

use strata_pipeline::Pipeline;
use strata_store::{
    BackendBlockStore, BlockStore, FsBlobBackend, MemoryBlockStore, TieredBlockStore,
};

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;
use crate::state::AppState;

/// Strata gateway server.
///
/// Wires the storage stack explicitly from config — filesystem blob
/// backend, durable tier, memory cache tier, tiered store, pipeline —
/// and serves the HTTP surface over it.
pub struct StrataServer {
    config: ServerConfig,
}

impl StrataServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let state = self.build_state()?;
        Ok(build_router(state, self.config.max_upload_size))
    }

    fn build_state(&self) -> ServerResult<AppState> {
        let backend = FsBlobBackend::open(&self.config.data_root)?;
        let cache = Arc::new(MemoryBlockStore::new());
        let durable = Arc::new(BackendBlockStore::new(backend));
        let store = TieredBlockStore::new(
            cache as Arc<dyn BlockStore>,
            durable as Arc<dyn BlockStore>,
        );
        let pipeline =
            Pipeline::with_chunk_size(Arc::new(store) as Arc<dyn BlockStore>, self.config.chunk_size);
        Ok(AppState::new(pipeline))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("strata server listening on {}", self.config.bind_addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
