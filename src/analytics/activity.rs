use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use super::context::AnalyticsContext;
use super::dates::DateRange;
use super::errors::AnalyticsError;
use super::logger::Operation;
use super::models::{ActivityDataPoint, StatsFilters};
use crate::matches::MatchRecord;

/// Counts matches per calendar day
pub struct ActivityAggregator {
    ctx: Arc<AnalyticsContext>,
}

impl ActivityAggregator {
    pub fn new(ctx: Arc<AnalyticsContext>) -> Self {
        Self { ctx }
    }

    /// One point per day of the range, ascending, zero-filled.
    /// Honours `player`, `category` and the date filters.
    pub async fn get_activity(&self, filters: &StatsFilters) -> Vec<ActivityDataPoint> {
        self.ctx
            .guarded(Operation::GetActivity, filters, self.compute(filters))
            .await
    }

    async fn compute(&self, filters: &StatsFilters) -> Result<Vec<ActivityDataPoint>, AnalyticsError> {
        let range = self.ctx.resolve_range(filters)?;

        let mut query = self.ctx.query();
        query.player = filters.player.clone();
        query.category = filters.category.clone();
        query.start_date = Some(range.start);
        query.end_date = Some(range.end);

        let matches = self.ctx.match_store.query_matches(&query).await?;
        Ok(bucket_by_day(&range, &matches))
    }
}

pub(crate) fn bucket_by_day(range: &DateRange, matches: &[MatchRecord]) -> Vec<ActivityDataPoint> {
    let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
    for record in matches {
        let day = record.day();
        if range.contains(day) {
            *per_day.entry(day).or_default() += 1;
        }
    }

    range
        .days()
        .map(|date| ActivityDataPoint {
            date,
            match_count: per_day.get(&date).copied().unwrap_or_default(),
        })
        .collect()
}
