use chrono::NaiveDate;
use thiserror::Error;

use crate::shared::StoreError;

/// Failures inside the engine. Never leaves `AnalyticsService`; the fail-soft
/// guard turns every variant into an empty or zero result.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Rating arithmetic overflowed")]
    RatingOverflow,
}
