use strum_macros::{AsRefStr, Display};
use tracing::{error, info, warn};

use super::models::StatsFilters;

pub const COMPONENT: &str = "analytics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    GetActivity,
    GetRatingHistory,
    GetWinRate,
    GetClassStats,
    GetGameLength,
    GetPlayerActivity,
    GetClassSelection,
    GetClassWinRate,
}

/// Where a log line came from and what the caller asked for
#[derive(Debug, Clone)]
pub struct LogContext {
    pub component: &'static str,
    pub operation: Operation,
    pub filters: StatsFilters,
}

impl LogContext {
    pub fn new(operation: Operation, filters: &StatsFilters) -> Self {
        Self {
            component: COMPONENT,
            operation,
            filters: filters.clone(),
        }
    }
}

/// Logging collaborator handed to the engine
pub trait AnalyticsLogger: Send + Sync {
    fn info(&self, context: &LogContext, message: &str);
    fn warn(&self, context: &LogContext, message: &str);
    fn error(&self, context: &LogContext, message: &str);
}

/// Forwards to `tracing` with the context as structured fields
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl AnalyticsLogger for TracingLogger {
    fn info(&self, context: &LogContext, message: &str) {
        info!(
            component = context.component,
            operation = context.operation.as_ref(),
            filters = %context.filters,
            "{message}"
        );
    }

    fn warn(&self, context: &LogContext, message: &str) {
        warn!(
            component = context.component,
            operation = context.operation.as_ref(),
            filters = %context.filters,
            "{message}"
        );
    }

    fn error(&self, context: &LogContext, message: &str) {
        error!(
            component = context.component,
            operation = context.operation.as_ref(),
            filters = %context.filters,
            "{message}"
        );
    }
}
