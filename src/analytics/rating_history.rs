use chrono::NaiveDate;
use std::sync::Arc;

use super::context::AnalyticsContext;
use super::errors::AnalyticsError;
use super::logger::{LogContext, Operation};
use super::models::{RatingHistoryPoint, StatsFilters};
use crate::config::AnchorMode;

/// A rating change attributable to one replayed match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AppliedDelta {
    pub date: NaiveDate,
    pub delta: i32,
}

/// Rebuilds a player's rating trajectory in one category by replaying the
/// stored per-match deltas in chronological order.
pub struct RatingHistoryReconstructor {
    ctx: Arc<AnalyticsContext>,
}

impl RatingHistoryReconstructor {
    pub fn new(ctx: Arc<AnalyticsContext>) -> Self {
        Self { ctx }
    }

    pub async fn get_rating_history(
        &self,
        player_name: &str,
        category: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Vec<RatingHistoryPoint> {
        let filters = StatsFilters {
            player: Some(player_name.to_string()),
            category: Some(category.to_string()),
            start_date: start_date.map(str::to_string),
            end_date: end_date.map(str::to_string),
            team_format: None,
        };
        self.ctx
            .guarded(
                Operation::GetRatingHistory,
                &filters,
                self.compute(player_name, category, &filters),
            )
            .await
    }

    async fn compute(
        &self,
        player_name: &str,
        category: &str,
        filters: &StatsFilters,
    ) -> Result<Vec<RatingHistoryPoint>, AnalyticsError> {
        let log = LogContext::new(Operation::GetRatingHistory, filters);
        let range = self.ctx.resolve_range(filters)?;

        let current_score = self
            .ctx
            .stats_store
            .get_player_category_stats(player_name, Some(category))
            .await?
            .map(|stats| stats.score);

        let window = self
            .replay_set(&log, player_name, category, range.start, Some(range.end))
            .await?;

        let anchor = match (self.ctx.config.anchor_mode, current_score) {
            (AnchorMode::ScoreAtStart, Some(score)) => {
                let later = match range.end.succ_opt() {
                    Some(next) => {
                        self.replay_set(&log, player_name, category, next, None)
                            .await?
                    }
                    None => ReplaySet::complete_empty(),
                };
                if window.complete && later.complete {
                    back_out(score, window.deltas.iter().chain(later.deltas.iter()))?
                } else {
                    self.ctx.logger.warn(
                        &log,
                        "Match history incomplete; anchoring at current score instead of backing out",
                    );
                    score
                }
            }
            (AnchorMode::CurrentScore, Some(score)) => score,
            (_, None) => self.ctx.config.default_rating,
        };

        fold_trajectory(range.start, anchor, &window.deltas)
    }

    /// Deltas for the player's matches from `start` through `end` (open when
    /// `None`). `complete` is false when any match in the span could not be
    /// read or the span was cut short by the query or fetch bounds.
    async fn replay_set(
        &self,
        log: &LogContext,
        player_name: &str,
        category: &str,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Result<ReplaySet, AnalyticsError> {
        let mut query = self.ctx.query();
        query.player = Some(player_name.to_string());
        query.category = Some(category.to_string());
        query.start_date = Some(start);
        query.end_date = end;

        let summaries = self.ctx.match_store.query_matches(&query).await?;
        let mut complete = summaries.len() < query.limit
            && summaries.len() <= self.ctx.config.max_detail_fetches;
        let fetched = self.ctx.fetch_details(log, summaries).await;

        let mut deltas = Vec::with_capacity(fetched.len());
        for entry in fetched {
            let Some(detail) = entry.detail else {
                complete = false;
                continue;
            };
            match detail.participant(player_name) {
                Some(participant) => match participant.rating_delta {
                    Some(delta) => deltas.push(AppliedDelta {
                        date: entry.summary.day(),
                        delta,
                    }),
                    None => self.ctx.logger.warn(
                        log,
                        &format!("Match {} has no rating delta for player; skipping", detail.id),
                    ),
                },
                None => self.ctx.logger.warn(
                    log,
                    &format!("Player missing from match {}; skipping", detail.id),
                ),
            }
        }

        Ok(ReplaySet { deltas, complete })
    }
}

struct ReplaySet {
    deltas: Vec<AppliedDelta>,
    complete: bool,
}

impl ReplaySet {
    fn complete_empty() -> Self {
        Self {
            deltas: Vec::new(),
            complete: true,
        }
    }
}

/// Rating before `deltas` were applied, given the rating after them
pub(crate) fn back_out<'a>(
    score: i32,
    deltas: impl IntoIterator<Item = &'a AppliedDelta>,
) -> Result<i32, AnalyticsError> {
    deltas
        .into_iter()
        .try_fold(score, |rating, applied| rating.checked_sub(applied.delta))
        .ok_or(AnalyticsError::RatingOverflow)
}

/// Left fold of `deltas` (already in replay order) onto `anchor`
pub(crate) fn fold_trajectory(
    anchor_date: NaiveDate,
    anchor: i32,
    deltas: &[AppliedDelta],
) -> Result<Vec<RatingHistoryPoint>, AnalyticsError> {
    let mut history = Vec::with_capacity(deltas.len() + 1);
    history.push(RatingHistoryPoint {
        date: anchor_date,
        rating: anchor,
    });

    let mut current = anchor;
    for applied in deltas {
        current = current
            .checked_add(applied.delta)
            .ok_or(AnalyticsError::RatingOverflow)?;
        history.push(RatingHistoryPoint {
            date: applied.date,
            rating: current,
        });
    }
    Ok(history)
}
