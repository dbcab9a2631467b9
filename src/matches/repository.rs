use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{MatchQuery, MatchRecord, Participant, ResultFlag};
use crate::shared::StoreError;

/// Read access to the archived match log
#[async_trait]
pub trait MatchLogStore: Send + Sync {
    /// Matches satisfying `query`, most recent first, at most `query.limit`.
    /// Participant lists may be left empty.
    async fn query_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>, StoreError>;

    /// Full record including participant flags and rating deltas
    async fn get_match_detail(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError>;
}

/// In-memory match log for development and testing
#[derive(Debug, Default)]
pub struct InMemoryMatchLogStore {
    matches: Arc<RwLock<HashMap<String, MatchRecord>>>,
}

impl InMemoryMatchLogStore {
    pub fn new() -> Self {
        Self {
            matches: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a store pre-populated with archived matches
    pub fn with_matches(matches: Vec<MatchRecord>) -> Self {
        let map = matches
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            matches: Arc::new(RwLock::new(map)),
        }
    }

    /// Seeds one archived match, replacing any record with the same id
    pub async fn insert_match(&self, record: MatchRecord) {
        self.matches.write().await.insert(record.id.clone(), record);
    }

    pub async fn match_count(&self) -> usize {
        self.matches.read().await.len()
    }
}

#[async_trait]
impl MatchLogStore for InMemoryMatchLogStore {
    #[instrument(skip(self))]
    async fn query_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>, StoreError> {
        let matches = self.matches.read().await;
        let mut found: Vec<MatchRecord> = matches
            .values()
            .filter(|record| query.matches(record))
            .map(MatchRecord::summary)
            .collect();

        found.sort_by(|a, b| MatchRecord::chronological(b, a));
        found.truncate(query.limit);

        debug!(match_count = found.len(), "Queried matches from memory");
        Ok(found)
    }

    #[instrument(skip(self))]
    async fn get_match_detail(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        let matches = self.matches.read().await;
        let record = matches.get(match_id).cloned();
        if record.is_none() {
            debug!(match_id = %match_id, "Match not found in memory");
        }
        Ok(record)
    }
}

/// PostgreSQL match log.
///
/// Reads `matches (id, played_at, category, duration_seconds)` and
/// `match_participants (match_id, player_name, flag, rating_delta, class)`.
pub struct PostgresMatchLogStore {
    pool: PgPool,
}

impl PostgresMatchLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn duration_from_row(raw: Option<i32>) -> u32 {
    raw.and_then(|seconds| u32::try_from(seconds).ok())
        .unwrap_or_default()
}

#[async_trait]
impl MatchLogStore for PostgresMatchLogStore {
    #[instrument(skip(self))]
    async fn query_matches(&self, query: &MatchQuery) -> Result<Vec<MatchRecord>, StoreError> {
        debug!("Querying matches from database");

        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            "SELECT m.id, m.played_at, m.category, m.duration_seconds FROM matches m \
             WHERE ($1::text IS NULL OR m.category = $1) \
             AND ($2::date IS NULL OR m.played_at >= ($2::date)::timestamp AT TIME ZONE 'UTC') \
             AND ($3::date IS NULL OR m.played_at < ($3::date + 1)::timestamp AT TIME ZONE 'UTC') \
             AND ($4::text IS NULL OR EXISTS ( \
                 SELECT 1 FROM match_participants p \
                 WHERE p.match_id = m.id AND lower(p.player_name) = lower($4))) \
             ORDER BY m.played_at DESC, m.id DESC LIMIT $5",
        )
        .bind(query.category.as_deref())
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(query.player.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to query matches from database");
            StoreError::from(e)
        })?;

        let matches = rows
            .iter()
            .map(|row| {
                Ok(MatchRecord {
                    id: row.try_get("id")?,
                    timestamp: row.try_get::<DateTime<Utc>, _>("played_at")?,
                    category: row.try_get("category")?,
                    duration_seconds: duration_from_row(row.try_get("duration_seconds")?),
                    participants: Vec::new(),
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        debug!(match_count = matches.len(), "Queried matches from database");
        Ok(matches)
    }

    #[instrument(skip(self))]
    async fn get_match_detail(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, played_at, category, duration_seconds FROM matches WHERE id = $1",
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to fetch match from database");
            StoreError::from(e)
        })?;

        let Some(row) = row else {
            debug!(match_id = %match_id, "Match not found in database");
            return Ok(None);
        };

        let participant_rows = sqlx::query(
            "SELECT player_name, flag, rating_delta, class FROM match_participants \
             WHERE match_id = $1 ORDER BY player_name",
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, match_id = %match_id, "Failed to fetch participants from database");
            StoreError::from(e)
        })?;

        let mut participants = Vec::with_capacity(participant_rows.len());
        for participant in &participant_rows {
            let flag: String = participant.try_get("flag")?;
            let result_flag = flag.parse::<ResultFlag>().map_err(|_| {
                StoreError::Decode(format!("unknown result flag '{flag}' in match {match_id}"))
            })?;
            participants.push(Participant {
                player_name: participant.try_get("player_name")?,
                result_flag,
                rating_delta: participant.try_get("rating_delta")?,
                class: participant.try_get("class")?,
            });
        }

        Ok(Some(MatchRecord {
            id: row.try_get("id")?,
            timestamp: row.try_get("played_at")?,
            category: row.try_get("category")?,
            duration_seconds: duration_from_row(row.try_get("duration_seconds")?),
            participants,
        }))
    }
}
