use std::sync::Arc;

use super::context::AnalyticsContext;
use super::dates::{parse_optional, DateRange};
use super::errors::AnalyticsError;
use super::logger::{LogContext, Operation};
use super::models::{StatsFilters, WinRateSummary};
use crate::matches::{MatchRecord, ResultFlag};

/// Win/loss/draw tallies for one player or the whole population
pub struct WinRateAggregator {
    ctx: Arc<AnalyticsContext>,
}

impl WinRateAggregator {
    pub fn new(ctx: Arc<AnalyticsContext>) -> Self {
        Self { ctx }
    }

    /// With `player` set, reads the player's stored totals for `category`
    /// (the default category when none is given); dates do not apply.
    /// Without a player, scans matches and tallies every participant flag.
    pub async fn get_win_rate(&self, filters: &StatsFilters) -> WinRateSummary {
        self.ctx
            .guarded(Operation::GetWinRate, filters, self.compute(filters))
            .await
    }

    async fn compute(&self, filters: &StatsFilters) -> Result<WinRateSummary, AnalyticsError> {
        match &filters.player {
            Some(player) => self.player_totals(player, filters.category.as_deref()).await,
            None => self.population_totals(filters).await,
        }
    }

    async fn player_totals(
        &self,
        player: &str,
        category: Option<&str>,
    ) -> Result<WinRateSummary, AnalyticsError> {
        let stats = self
            .ctx
            .stats_store
            .get_player_category_stats(player, category)
            .await?;

        Ok(stats
            .map(|s| WinRateSummary {
                wins: s.wins,
                losses: s.losses,
                draws: s.draws,
            })
            .unwrap_or_default())
    }

    async fn population_totals(&self, filters: &StatsFilters) -> Result<WinRateSummary, AnalyticsError> {
        let log = LogContext::new(Operation::GetWinRate, filters);

        // Population scans are unbounded in time unless the caller gives dates
        let start = parse_optional(filters.start_date.as_deref());
        let end = parse_optional(filters.end_date.as_deref());
        if let (Some(start), Some(end)) = (start, end) {
            DateRange::new(start, end)?;
        }

        let mut query = self.ctx.query();
        query.category = filters.category.clone();
        query.start_date = start;
        query.end_date = end;

        let summaries = self.ctx.match_store.query_matches(&query).await?;
        let fetched = self.ctx.fetch_details(&log, summaries).await;

        let details: Vec<MatchRecord> = fetched.into_iter().filter_map(|f| f.detail).collect();
        Ok(tally_flags(&details))
    }
}

pub(crate) fn tally_flags(matches: &[MatchRecord]) -> WinRateSummary {
    let mut summary = WinRateSummary::default();
    for participant in matches.iter().flat_map(|m| m.participants.iter()) {
        match participant.result_flag {
            ResultFlag::Winner => summary.wins += 1,
            ResultFlag::Loser => summary.losses += 1,
            ResultFlag::Drawer => summary.draws += 1,
        }
    }
    summary
}
