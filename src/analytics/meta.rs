use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use super::context::{AnalyticsContext, FetchedMatch};
use super::dates::{first_of_month, DateRange};
use super::errors::AnalyticsError;
use super::logger::{LogContext, Operation};
use super::models::{
    ClassSelection, ClassWinRate, GameLengthDataPoint, PlayerActivityDataPoint, StatsFilters,
};
use crate::matches::{MatchRecord, Participant, ResultFlag};

/// Community-wide charts for the meta page. Every operation honours
/// `category`, the date filters and `teamFormat`; `player` is ignored.
pub struct MetaAggregator {
    ctx: Arc<AnalyticsContext>,
}

impl MetaAggregator {
    pub fn new(ctx: Arc<AnalyticsContext>) -> Self {
        Self { ctx }
    }

    pub async fn get_game_length(&self, filters: &StatsFilters) -> Vec<GameLengthDataPoint> {
        self.ctx
            .guarded(Operation::GetGameLength, filters, self.game_length(filters))
            .await
    }

    pub async fn get_player_activity(&self, filters: &StatsFilters) -> Vec<PlayerActivityDataPoint> {
        self.ctx
            .guarded(
                Operation::GetPlayerActivity,
                filters,
                self.player_activity(filters),
            )
            .await
    }

    pub async fn get_class_selection(&self, filters: &StatsFilters) -> Vec<ClassSelection> {
        self.ctx
            .guarded(
                Operation::GetClassSelection,
                filters,
                self.class_selection(filters),
            )
            .await
    }

    pub async fn get_class_win_rate(&self, filters: &StatsFilters) -> Vec<ClassWinRate> {
        self.ctx
            .guarded(
                Operation::GetClassWinRate,
                filters,
                self.class_win_rate(filters),
            )
            .await
    }

    async fn game_length(
        &self,
        filters: &StatsFilters,
    ) -> Result<Vec<GameLengthDataPoint>, AnalyticsError> {
        let log = LogContext::new(Operation::GetGameLength, filters);
        let range = self.ctx.resolve_range(filters)?;
        let matches = match filters.team_format.as_deref() {
            // Format is only known from participant flags
            Some(format) => self
                .scan(&log, filters, &range)
                .await?
                .into_iter()
                .filter(|entry| has_team_format(entry, Some(format)))
                .map(|entry| entry.summary)
                .collect(),
            None => self.summaries(filters, &range).await?,
        };
        Ok(average_duration_by_day(&range, &matches))
    }

    async fn player_activity(
        &self,
        filters: &StatsFilters,
    ) -> Result<Vec<PlayerActivityDataPoint>, AnalyticsError> {
        let log = LogContext::new(Operation::GetPlayerActivity, filters);
        let range = self.ctx.resolve_range(filters)?;
        let details = self.filtered_details(&log, filters, &range).await?;
        Ok(distinct_players_by_month(&range, &details))
    }

    async fn class_selection(
        &self,
        filters: &StatsFilters,
    ) -> Result<Vec<ClassSelection>, AnalyticsError> {
        let log = LogContext::new(Operation::GetClassSelection, filters);
        let range = self.ctx.resolve_range(filters)?;
        let details = self.filtered_details(&log, filters, &range).await?;
        Ok(tally_class_selection(&details))
    }

    async fn class_win_rate(
        &self,
        filters: &StatsFilters,
    ) -> Result<Vec<ClassWinRate>, AnalyticsError> {
        let log = LogContext::new(Operation::GetClassWinRate, filters);
        let range = self.ctx.resolve_range(filters)?;
        let details = self.filtered_details(&log, filters, &range).await?;
        Ok(class_win_rates(&details))
    }

    async fn summaries(
        &self,
        filters: &StatsFilters,
        range: &DateRange,
    ) -> Result<Vec<MatchRecord>, AnalyticsError> {
        let mut query = self.ctx.query();
        query.category = filters.category.clone();
        query.start_date = Some(range.start);
        query.end_date = Some(range.end);
        Ok(self.ctx.match_store.query_matches(&query).await?)
    }

    async fn scan(
        &self,
        log: &LogContext,
        filters: &StatsFilters,
        range: &DateRange,
    ) -> Result<Vec<FetchedMatch>, AnalyticsError> {
        let summaries = self.summaries(filters, range).await?;
        Ok(self.ctx.fetch_details(log, summaries).await)
    }

    /// Full records that pass the team format filter; failed lookups dropped
    async fn filtered_details(
        &self,
        log: &LogContext,
        filters: &StatsFilters,
        range: &DateRange,
    ) -> Result<Vec<MatchRecord>, AnalyticsError> {
        let team_format = filters.team_format.as_deref();
        Ok(self
            .scan(log, filters, range)
            .await?
            .into_iter()
            .filter(|entry| has_team_format(entry, team_format))
            .filter_map(|entry| entry.detail)
            .collect())
    }
}

/// Matches whose detail could not be read are not excluded by format
fn has_team_format(entry: &FetchedMatch, team_format: Option<&str>) -> bool {
    match (team_format, &entry.detail) {
        (Some(format), Some(detail)) => detail.team_format() == format,
        _ => true,
    }
}

fn class_key(participant: &Participant) -> Option<String> {
    if participant.result_flag == ResultFlag::Drawer {
        return None;
    }
    let class = participant.class.as_deref()?.trim().to_lowercase();
    (!class.is_empty()).then_some(class)
}

pub(crate) fn average_duration_by_day(
    range: &DateRange,
    matches: &[MatchRecord],
) -> Vec<GameLengthDataPoint> {
    let mut per_day: HashMap<NaiveDate, (f64, u32)> = HashMap::new();
    for record in matches.iter().filter(|m| range.contains(m.day())) {
        let entry = per_day.entry(record.day()).or_insert((0.0, 0));
        entry.0 += f64::from(record.duration_seconds) / 60.0;
        entry.1 += 1;
    }

    range
        .days()
        .map(|date| GameLengthDataPoint {
            date,
            average_duration: match per_day.get(&date) {
                Some((total, count)) if *count > 0 => total / f64::from(*count),
                _ => 0.0,
            },
        })
        .collect()
}

pub(crate) fn distinct_players_by_month(
    range: &DateRange,
    matches: &[MatchRecord],
) -> Vec<PlayerActivityDataPoint> {
    let mut per_month: HashMap<NaiveDate, HashSet<String>> = HashMap::new();
    for record in matches.iter().filter(|m| range.contains(m.day())) {
        let players = per_month.entry(first_of_month(record.day())).or_default();
        for participant in &record.participants {
            players.insert(participant.player_name.to_lowercase());
        }
    }

    range
        .months()
        .into_iter()
        .map(|date| PlayerActivityDataPoint {
            date,
            players: per_month.get(&date).map_or(0, |p| p.len() as u32),
        })
        .collect()
}

pub(crate) fn tally_class_selection(matches: &[MatchRecord]) -> Vec<ClassSelection> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for class in matches
        .iter()
        .flat_map(|m| m.participants.iter())
        .filter_map(class_key)
    {
        *counts.entry(class).or_default() += 1;
    }

    let mut selection: Vec<ClassSelection> = counts
        .into_iter()
        .map(|(class_name, count)| ClassSelection { class_name, count })
        .collect();
    // Stable sort keeps name order for equal counts
    selection.sort_by(|a, b| b.count.cmp(&a.count));
    selection
}

pub(crate) fn class_win_rates(matches: &[MatchRecord]) -> Vec<ClassWinRate> {
    let mut tallies: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for participant in matches.iter().flat_map(|m| m.participants.iter()) {
        let Some(class) = class_key(participant) else {
            continue;
        };
        let tally = tallies.entry(class).or_default();
        match participant.result_flag {
            ResultFlag::Winner => tally.0 += 1,
            ResultFlag::Loser => tally.1 += 1,
            ResultFlag::Drawer => {}
        }
    }

    let mut rates: Vec<ClassWinRate> = tallies
        .into_iter()
        .map(|(class_name, (wins, losses))| {
            let total = wins + losses;
            let win_rate = if total > 0 {
                f64::from(wins) / f64::from(total) * 100.0
            } else {
                0.0
            };
            ClassWinRate {
                class_name,
                win_rate,
            }
        })
        .collect();
    rates.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
    rates
}
