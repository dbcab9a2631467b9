use std::sync::Arc;

use community_stats::{
    build_app, AnalyticsConfig, AnalyticsService, AnchorMode, AppState, InMemoryMatchLogStore,
    InMemoryPlayerStatsStore, MatchLogStore, MatchRecord, PlayerStats, PlayerStatsStore,
};

use super::mocks::RecordingLogger;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub service: Arc<AnalyticsService>,
    pub logger: RecordingLogger,
}

impl TestSetup {
    pub fn router(&self) -> axum::Router {
        build_app(AppState::new(Arc::clone(&self.service)))
    }
}

pub struct TestSetupBuilder {
    match_store: Option<Arc<dyn MatchLogStore>>,
    matches: Vec<MatchRecord>,
    stats_store: Option<Arc<dyn PlayerStatsStore>>,
    players: Vec<PlayerStats>,
    config: AnalyticsConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            match_store: None,
            matches: Vec::new(),
            stats_store: None,
            players: Vec::new(),
            config: AnalyticsConfig::default(),
        }
    }

    pub fn with_matches(mut self, matches: Vec<MatchRecord>) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_match_store(mut self, store: Arc<dyn MatchLogStore>) -> Self {
        self.match_store = Some(store);
        self
    }

    pub fn with_players(mut self, players: Vec<PlayerStats>) -> Self {
        self.players = players;
        self
    }

    pub fn with_stats_store(mut self, store: Arc<dyn PlayerStatsStore>) -> Self {
        self.stats_store = Some(store);
        self
    }

    pub fn with_anchor_mode(mut self, anchor_mode: AnchorMode) -> Self {
        self.config.anchor_mode = anchor_mode;
        self
    }

    pub fn with_config(mut self, config: AnalyticsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TestSetup {
        let match_store = self
            .match_store
            .unwrap_or_else(|| Arc::new(InMemoryMatchLogStore::with_matches(self.matches)));
        let stats_store = self
            .stats_store
            .unwrap_or_else(|| Arc::new(InMemoryPlayerStatsStore::with_players(self.players)));
        let logger = RecordingLogger::new();

        let service = AnalyticsService::builder(match_store, stats_store)
            .with_logger(Arc::new(logger.clone()))
            .with_config(self.config)
            .build();

        TestSetup {
            service: Arc::new(service),
            logger,
        }
    }
}
