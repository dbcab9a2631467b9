use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{PlayerCategoryStats, PlayerStats};
use crate::shared::StoreError;

/// Read access to per-player aggregate stats
#[async_trait]
pub trait PlayerStatsStore: Send + Sync {
    /// All category stats for a player; names match case-insensitively
    async fn get_player_stats(&self, player_name: &str) -> Result<Option<PlayerStats>, StoreError>;

    /// Stats for one category, `None` meaning the default category
    async fn get_player_category_stats(
        &self,
        player_name: &str,
        category: Option<&str>,
    ) -> Result<Option<PlayerCategoryStats>, StoreError> {
        let stats = self.get_player_stats(player_name).await?;
        Ok(stats.and_then(|s| s.category(category).cloned()))
    }
}

/// In-memory player stats for development and testing
#[derive(Debug, Default)]
pub struct InMemoryPlayerStatsStore {
    players: Arc<RwLock<HashMap<String, PlayerStats>>>,
}

impl InMemoryPlayerStatsStore {
    pub fn new() -> Self {
        Self {
            players: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_players(players: Vec<PlayerStats>) -> Self {
        let map = players
            .into_iter()
            .map(|stats| (stats.name.to_lowercase(), stats))
            .collect();
        Self {
            players: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn upsert_player(&self, stats: PlayerStats) {
        self.players
            .write()
            .await
            .insert(stats.name.to_lowercase(), stats);
    }
}

#[async_trait]
impl PlayerStatsStore for InMemoryPlayerStatsStore {
    #[instrument(skip(self))]
    async fn get_player_stats(&self, player_name: &str) -> Result<Option<PlayerStats>, StoreError> {
        let players = self.players.read().await;
        let stats = players.get(&player_name.to_lowercase()).cloned();
        if stats.is_none() {
            debug!(player_name = %player_name, "Player stats not found in memory");
        }
        Ok(stats)
    }
}

/// PostgreSQL player stats.
///
/// Reads `player_category_stats (player_name, category, score, wins, losses,
/// draws, games_played)`.
pub struct PostgresPlayerStatsStore {
    pool: PgPool,
}

impl PostgresPlayerStatsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn count_from_row(row: &sqlx::postgres::PgRow, column: &str) -> Result<u32, StoreError> {
    let raw: i32 = row.try_get(column)?;
    u32::try_from(raw).map_err(|_| StoreError::Decode(format!("negative {column}: {raw}")))
}

#[async_trait]
impl PlayerStatsStore for PostgresPlayerStatsStore {
    #[instrument(skip(self))]
    async fn get_player_stats(&self, player_name: &str) -> Result<Option<PlayerStats>, StoreError> {
        debug!(player_name = %player_name, "Fetching player stats from database");

        let rows = sqlx::query(
            "SELECT player_name, category, score, wins, losses, draws, games_played \
             FROM player_category_stats WHERE lower(player_name) = lower($1)",
        )
        .bind(player_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, player_name = %player_name, "Failed to fetch player stats from database");
            StoreError::from(e)
        })?;

        let Some(first) = rows.first() else {
            debug!(player_name = %player_name, "Player stats not found in database");
            return Ok(None);
        };

        let mut stats = PlayerStats::new(first.try_get::<String, _>("player_name")?);
        for row in &rows {
            let category: String = row.try_get("category")?;
            stats.categories.insert(
                category,
                PlayerCategoryStats {
                    score: row.try_get("score")?,
                    wins: count_from_row(row, "wins")?,
                    losses: count_from_row(row, "losses")?,
                    draws: count_from_row(row, "draws")?,
                    games_played: count_from_row(row, "games_played")?,
                },
            );
        }

        Ok(Some(stats))
    }
}
