use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use community_stats::{
    analytics::{AnalyticsLogger, LogContext},
    matches::MatchQuery,
    InMemoryMatchLogStore, MatchLogStore, MatchRecord, PlayerStats, PlayerStatsStore, StoreError,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Match log that can fail or stall lookups for chosen match ids
pub struct FlakyMatchLogStore {
    inner: InMemoryMatchLogStore,
    failing: HashSet<String>,
    stalling: HashMap<String, Duration>,
    query_delay: Option<Duration>,
    detail_calls: Mutex<Vec<String>>,
}

impl FlakyMatchLogStore {
    pub fn new(matches: Vec<MatchRecord>) -> Self {
        Self {
            inner: InMemoryMatchLogStore::with_matches(matches),
            failing: HashSet::new(),
            stalling: HashMap::new(),
            query_delay: None,
            detail_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_detail(mut self, match_id: &str) -> Self {
        self.failing.insert(match_id.to_string());
        self
    }

    pub fn stalling_detail(mut self, match_id: &str, delay: Duration) -> Self {
        self.stalling.insert(match_id.to_string(), delay);
        self
    }

    pub fn stalling_queries(mut self, delay: Duration) -> Self {
        self.query_delay = Some(delay);
        self
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MatchLogStore for FlakyMatchLogStore {
    async fn query_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>, StoreError> {
        if let Some(delay) = self.query_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.query_matches(query).await
    }

    async fn get_match_detail(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        self.detail_calls.lock().unwrap().push(match_id.to_string());
        if self.failing.contains(match_id) {
            return Err(StoreError::Unavailable(format!("replica lost {match_id}")));
        }
        if let Some(delay) = self.stalling.get(match_id) {
            tokio::time::sleep(*delay).await;
        }
        self.inner.get_match_detail(match_id).await
    }
}

/// Player stats store that is always down
pub struct BrokenStatsStore;

#[async_trait]
impl PlayerStatsStore for BrokenStatsStore {
    async fn get_player_stats(&self, _player_name: &str) -> Result<Option<PlayerStats>, StoreError> {
        Err(StoreError::Database("connection reset".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: &'static str,
    pub component: &'static str,
    pub operation: String,
    pub filters: String,
    pub message: String,
}

/// Captures everything the engine logs
#[derive(Clone, Default)]
pub struct RecordingLogger {
    lines: Arc<Mutex<Vec<LogLine>>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().unwrap().clone()
    }

    pub fn at(&self, level: &str) -> Vec<LogLine> {
        self.lines()
            .into_iter()
            .filter(|line| line.level == level)
            .collect()
    }

    fn record(&self, level: &'static str, context: &LogContext, message: &str) {
        self.lines.lock().unwrap().push(LogLine {
            level,
            component: context.component,
            operation: context.operation.to_string(),
            filters: context.filters.to_string(),
            message: message.to_string(),
        });
    }
}

impl AnalyticsLogger for RecordingLogger {
    fn info(&self, context: &LogContext, message: &str) {
        self.record("info", context, message);
    }

    fn warn(&self, context: &LogContext, message: &str) {
        self.record("warn", context, message);
    }

    fn error(&self, context: &LogContext, message: &str) {
        self.record("error", context, message);
    }
}
