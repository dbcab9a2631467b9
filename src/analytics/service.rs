use std::sync::Arc;

use super::{
    activity::ActivityAggregator,
    class_stats::ClassStatsAggregator,
    context::AnalyticsContext,
    logger::{AnalyticsLogger, TracingLogger},
    meta::MetaAggregator,
    models::{
        ActivityDataPoint, ClassSelection, ClassStat, ClassWinRate, GameLengthDataPoint,
        MetaSummary, PlayerActivityDataPoint, RatingHistoryPoint, StatsFilters, WinRateSummary,
    },
    rating_history::RatingHistoryReconstructor,
    win_rate::WinRateAggregator,
};
use crate::config::AnalyticsConfig;
use crate::matches::MatchLogStore;
use crate::players::PlayerStatsStore;

/// Entry point for community statistics. Every operation is read-only and
/// never fails: store errors, timeouts and bad input come back as empty or
/// zero-valued results.
pub struct AnalyticsService {
    activity: ActivityAggregator,
    rating_history: RatingHistoryReconstructor,
    win_rate: WinRateAggregator,
    class_stats: ClassStatsAggregator,
    meta: MetaAggregator,
}

impl AnalyticsService {
    pub fn builder(
        match_store: Arc<dyn MatchLogStore>,
        stats_store: Arc<dyn PlayerStatsStore>,
    ) -> AnalyticsServiceBuilder {
        AnalyticsServiceBuilder::new(match_store, stats_store)
    }

    pub async fn get_activity(&self, filters: &StatsFilters) -> Vec<ActivityDataPoint> {
        self.activity.get_activity(filters).await
    }

    pub async fn get_rating_history(
        &self,
        player_name: &str,
        category: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Vec<RatingHistoryPoint> {
        self.rating_history
            .get_rating_history(player_name, category, start_date, end_date)
            .await
    }

    pub async fn get_win_rate(&self, filters: &StatsFilters) -> WinRateSummary {
        self.win_rate.get_win_rate(filters).await
    }

    pub async fn get_class_stats(&self, category: Option<&str>) -> Vec<ClassStat> {
        self.class_stats.get_class_stats(category).await
    }

    pub async fn get_game_length(&self, filters: &StatsFilters) -> Vec<GameLengthDataPoint> {
        self.meta.get_game_length(filters).await
    }

    pub async fn get_player_activity(&self, filters: &StatsFilters) -> Vec<PlayerActivityDataPoint> {
        self.meta.get_player_activity(filters).await
    }

    pub async fn get_class_selection(&self, filters: &StatsFilters) -> Vec<ClassSelection> {
        self.meta.get_class_selection(filters).await
    }

    pub async fn get_class_win_rate(&self, filters: &StatsFilters) -> Vec<ClassWinRate> {
        self.meta.get_class_win_rate(filters).await
    }

    /// All meta-page charts, computed concurrently. Activity is community-wide
    /// here, so any `player` filter is dropped.
    pub async fn get_meta(&self, filters: &StatsFilters) -> MetaSummary {
        let community = StatsFilters {
            player: None,
            ..filters.clone()
        };

        let (activity, game_length, player_activity, class_selection, class_win_rates) = tokio::join!(
            self.activity.get_activity(&community),
            self.meta.get_game_length(&community),
            self.meta.get_player_activity(&community),
            self.meta.get_class_selection(&community),
            self.meta.get_class_win_rate(&community),
        );

        MetaSummary {
            activity,
            game_length,
            player_activity,
            class_selection,
            class_win_rates,
        }
    }
}

pub struct AnalyticsServiceBuilder {
    match_store: Arc<dyn MatchLogStore>,
    stats_store: Arc<dyn PlayerStatsStore>,
    logger: Arc<dyn AnalyticsLogger>,
    config: AnalyticsConfig,
}

impl AnalyticsServiceBuilder {
    fn new(match_store: Arc<dyn MatchLogStore>, stats_store: Arc<dyn PlayerStatsStore>) -> Self {
        Self {
            match_store,
            stats_store,
            logger: Arc::new(TracingLogger),
            config: AnalyticsConfig::default(),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn AnalyticsLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_config(mut self, config: AnalyticsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> AnalyticsService {
        let ctx = Arc::new(AnalyticsContext {
            match_store: self.match_store,
            stats_store: self.stats_store,
            logger: self.logger,
            config: self.config,
        });

        AnalyticsService {
            activity: ActivityAggregator::new(Arc::clone(&ctx)),
            rating_history: RatingHistoryReconstructor::new(Arc::clone(&ctx)),
            win_rate: WinRateAggregator::new(Arc::clone(&ctx)),
            class_stats: ClassStatsAggregator::new(Arc::clone(&ctx)),
            meta: MetaAggregator::new(ctx),
        }
    }
}
