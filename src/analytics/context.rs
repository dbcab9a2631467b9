use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::time::timeout;

use super::dates::DateRange;
use super::errors::AnalyticsError;
use super::fail_soft::degrade_to_default;
use super::logger::{AnalyticsLogger, LogContext, Operation};
use super::models::StatsFilters;
use crate::config::AnalyticsConfig;
use crate::matches::{MatchLogStore, MatchQuery, MatchRecord};
use crate::players::PlayerStatsStore;

/// A match summary paired with its full record, `None` when the lookup failed
#[derive(Debug, Clone)]
pub struct FetchedMatch {
    pub summary: MatchRecord,
    pub detail: Option<MatchRecord>,
}

/// Collaborators and bounds shared by every aggregator
pub struct AnalyticsContext {
    pub match_store: Arc<dyn MatchLogStore>,
    pub stats_store: Arc<dyn PlayerStatsStore>,
    pub logger: Arc<dyn AnalyticsLogger>,
    pub config: AnalyticsConfig,
}

impl AnalyticsContext {
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    pub fn resolve_range(&self, filters: &StatsFilters) -> Result<DateRange, AnalyticsError> {
        DateRange::resolve(
            filters.start_date.as_deref(),
            filters.end_date.as_deref(),
            self.today(),
            self.config.default_window_days,
        )
    }

    pub fn query(&self) -> MatchQuery {
        MatchQuery::new(self.config.query_limit)
    }

    /// Logs the request, then runs `work` under the fail-soft contract
    pub async fn guarded<T, F>(&self, operation: Operation, filters: &StatsFilters, work: F) -> T
    where
        T: Default,
        F: Future<Output = Result<T, AnalyticsError>>,
    {
        let context = LogContext::new(operation, filters);
        self.logger.info(&context, "Computing analytics");
        degrade_to_default(
            self.logger.as_ref(),
            &context,
            self.config.call_timeout,
            work,
        )
        .await
    }

    /// Looks up full records for `summaries` with bounded concurrency.
    ///
    /// The result is in replay order (timestamp, then id) regardless of the
    /// order lookups complete in. Failed, missing and timed-out lookups are
    /// logged and come back with `detail: None`.
    pub async fn fetch_details(
        &self,
        context: &LogContext,
        mut summaries: Vec<MatchRecord>,
    ) -> Vec<FetchedMatch> {
        summaries.sort_by(MatchRecord::chronological);

        let cap = self.config.max_detail_fetches;
        if summaries.len() > cap {
            self.logger.warn(
                context,
                &format!(
                    "Detail lookups capped at {cap}; ignoring {} later matches",
                    summaries.len() - cap
                ),
            );
            summaries.truncate(cap);
        }

        let per_fetch = self.config.detail_timeout;
        let store = Arc::clone(&self.match_store);

        let mut fetched: Vec<FetchedMatch> = stream::iter(summaries)
            .map(|summary| {
                let store = Arc::clone(&store);
                async move {
                    let outcome = timeout(per_fetch, store.get_match_detail(&summary.id)).await;
                    (summary, outcome)
                }
            })
            .buffer_unordered(self.config.detail_concurrency.max(1))
            .map(|(summary, outcome)| {
                let detail = match outcome {
                    Ok(Ok(Some(detail))) => Some(detail),
                    Ok(Ok(None)) => {
                        self.logger.warn(
                            context,
                            &format!("Match {} vanished from the log; skipping", summary.id),
                        );
                        None
                    }
                    Ok(Err(err)) => {
                        self.logger.warn(
                            context,
                            &format!("Failed to fetch match {}: {err}; skipping", summary.id),
                        );
                        None
                    }
                    Err(_) => {
                        self.logger.warn(
                            context,
                            &format!(
                                "Fetching match {} timed out after {}s; skipping",
                                summary.id,
                                per_fetch.as_secs()
                            ),
                        );
                        None
                    }
                };
                FetchedMatch { summary, detail }
            })
            .collect()
            .await;

        fetched.sort_by(|a, b| MatchRecord::chronological(&a.summary, &b.summary));
        fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::{InMemoryMatchLogStore, Participant, ResultFlag};
    use crate::players::InMemoryPlayerStatsStore;
    use crate::shared::test_utils::{FlakyDetailStore, Level, RecordingLogger};
    use chrono::{TimeZone, Utc};

    fn record(id: &str, hour: u32) -> MatchRecord {
        let mut record = MatchRecord::new(
            id,
            Utc.with_ymd_and_hms(2024, 4, 1, hour, 0, 0).unwrap(),
            "duel",
        );
        record.participants = vec![Participant::new("alice", ResultFlag::Winner)];
        record
    }

    fn context_with(
        store: Arc<dyn MatchLogStore>,
        logger: Arc<RecordingLogger>,
        config: AnalyticsConfig,
    ) -> AnalyticsContext {
        AnalyticsContext {
            match_store: store,
            stats_store: Arc::new(InMemoryPlayerStatsStore::new()),
            logger,
            config,
        }
    }

    fn log_context() -> LogContext {
        LogContext::new(Operation::GetRatingHistory, &StatsFilters::new())
    }

    #[tokio::test]
    async fn returns_details_in_replay_order() {
        let records: Vec<MatchRecord> = (0..20).map(|i| record(&format!("m-{i:02}"), i)).collect();
        let summaries: Vec<MatchRecord> = records.iter().rev().map(MatchRecord::summary).collect();
        let store = Arc::new(InMemoryMatchLogStore::with_matches(records));
        let logger = Arc::new(RecordingLogger::new());
        let config = AnalyticsConfig {
            detail_concurrency: 4,
            ..AnalyticsConfig::default()
        };
        let ctx = context_with(store, logger, config);

        let fetched = ctx.fetch_details(&log_context(), summaries).await;

        let ids: Vec<&str> = fetched.iter().map(|f| f.summary.id.as_str()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("m-{i:02}")).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
        assert!(fetched.iter().all(|f| f.detail.is_some()));
    }

    #[tokio::test]
    async fn failed_lookups_are_kept_without_detail() {
        let records = vec![record("a", 1), record("b", 2), record("c", 3)];
        let summaries: Vec<MatchRecord> = records.iter().map(MatchRecord::summary).collect();
        let store = Arc::new(FlakyDetailStore::new(
            InMemoryMatchLogStore::with_matches(records),
            &["b"],
        ));
        let logger = Arc::new(RecordingLogger::new());
        let ctx = context_with(store, logger.clone(), AnalyticsConfig::default());

        let fetched = ctx.fetch_details(&log_context(), summaries).await;

        assert_eq!(fetched.len(), 3);
        assert!(fetched[1].detail.is_none());
        assert!(fetched[0].detail.is_some() && fetched[2].detail.is_some());
        let warnings = logger.lines_at(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Failed to fetch match b"));
    }

    #[tokio::test]
    async fn caps_number_of_lookups() {
        let records: Vec<MatchRecord> = (0..5).map(|i| record(&format!("m-{i}"), i)).collect();
        let summaries: Vec<MatchRecord> = records.iter().map(MatchRecord::summary).collect();
        let store = Arc::new(InMemoryMatchLogStore::with_matches(records));
        let logger = Arc::new(RecordingLogger::new());
        let config = AnalyticsConfig {
            max_detail_fetches: 3,
            ..AnalyticsConfig::default()
        };
        let ctx = context_with(store, logger.clone(), config);

        let fetched = ctx.fetch_details(&log_context(), summaries).await;

        let ids: Vec<&str> = fetched.iter().map(|f| f.summary.id.as_str()).collect();
        assert_eq!(ids, vec!["m-0", "m-1", "m-2"]);
        assert!(logger.lines_at(Level::Warn)[0].contains("capped at 3"));
    }
}
