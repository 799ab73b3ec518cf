use std::sync::Arc;

use crate::{
    db::{GameCatalog, InMemoryStore, PgStore, RatingStore},
    services::{EngineSettings, RecommendationEngine},
};

/// Shared application state
///
/// Holds only immutable handles; each request builds its own working data.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
    pub catalog: Arc<dyn GameCatalog>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RatingStore>,
        catalog: Arc<dyn GameCatalog>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            engine: Arc::new(RecommendationEngine::new(store, settings)),
            catalog,
        }
    }

    /// State backed by PostgreSQL for both ratings and games
    pub fn with_postgres(store: PgStore, settings: EngineSettings) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, settings)
    }

    /// State backed by an in-memory fixture
    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, EngineSettings::default())
    }
}
