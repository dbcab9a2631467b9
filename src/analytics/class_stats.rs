use std::sync::Arc;

use super::context::AnalyticsContext;
use super::errors::AnalyticsError;
use super::logger::{LogContext, Operation};
use super::models::{ClassStat, StatsFilters};

/// Placeholder for per-class aggregation. Keeps the endpoint and result shape
/// stable; always answers with an empty list.
pub struct ClassStatsAggregator {
    ctx: Arc<AnalyticsContext>,
}

impl ClassStatsAggregator {
    pub fn new(ctx: Arc<AnalyticsContext>) -> Self {
        Self { ctx }
    }

    pub async fn get_class_stats(&self, category: Option<&str>) -> Vec<ClassStat> {
        let filters = StatsFilters {
            category: category.map(str::to_string),
            ..StatsFilters::default()
        };
        self.ctx
            .guarded(Operation::GetClassStats, &filters, async {
                let log = LogContext::new(Operation::GetClassStats, &filters);
                self.ctx
                    .logger
                    .warn(&log, "Class statistics aggregation is not implemented");
                Ok::<_, AnalyticsError>(Vec::new())
            })
            .await
    }
}
