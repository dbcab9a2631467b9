use std::str::FromStr;
use std::time::Duration;
use strum_macros::{Display, EnumString};
use tracing::warn;

/// How the first point of a rating trajectory is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum AnchorMode {
    /// Current score with every delta from the window start until now backed out
    ScoreAtStart,
    /// Current score as stored, replayed forward from the window start
    CurrentScore,
}

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Anchor used when a player has no stats for the category
    pub default_rating: i32,
    /// Length of the window used when no start date is given
    pub default_window_days: i64,
    /// Upper bound on matches read from the log per query
    pub query_limit: usize,
    /// Upper bound on per-match detail lookups per call
    pub max_detail_fetches: usize,
    pub detail_concurrency: usize,
    pub call_timeout: Duration,
    pub detail_timeout: Duration,
    pub anchor_mode: AnchorMode,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_rating: 1000,
            default_window_days: 365,
            query_limit: 10_000,
            max_detail_fetches: 10_000,
            detail_concurrency: 16,
            call_timeout: Duration::from_secs(30),
            detail_timeout: Duration::from_secs(5),
            anchor_mode: AnchorMode::ScoreAtStart,
        }
    }
}

impl AnalyticsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source, keeping defaults for
    /// missing or unparseable entries
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            default_rating: parse_or(&lookup, "STATS_DEFAULT_RATING", defaults.default_rating),
            default_window_days: parse_or(
                &lookup,
                "STATS_DEFAULT_WINDOW_DAYS",
                defaults.default_window_days,
            ),
            query_limit: parse_or(&lookup, "STATS_QUERY_LIMIT", defaults.query_limit),
            max_detail_fetches: parse_or(
                &lookup,
                "STATS_MAX_DETAIL_FETCHES",
                defaults.max_detail_fetches,
            ),
            detail_concurrency: parse_or(
                &lookup,
                "STATS_DETAIL_CONCURRENCY",
                defaults.detail_concurrency,
            )
            .max(1),
            call_timeout: Duration::from_secs(parse_or(
                &lookup,
                "STATS_CALL_TIMEOUT_SECS",
                defaults.call_timeout.as_secs(),
            )),
            detail_timeout: Duration::from_secs(parse_or(
                &lookup,
                "STATS_DETAIL_TIMEOUT_SECS",
                defaults.detail_timeout.as_secs(),
            )),
            anchor_mode: parse_or(&lookup, "STATS_ANCHOR_MODE", defaults.anchor_mode),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Unset means the in-memory stores are used
    pub database_url: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bind_addr: lookup("STATS_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, fallback = %default, "Ignoring unparseable setting");
            default
        }),
        None => default,
    }
}
