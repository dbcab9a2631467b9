use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use super::errors::AnalyticsError;
use super::logger::{AnalyticsLogger, LogContext};

/// Runs one aggregator call under the engine's failure contract: errors and
/// timeouts are logged with their context and replaced by `T::default()`.
pub async fn degrade_to_default<T, F>(
    logger: &dyn AnalyticsLogger,
    context: &LogContext,
    limit: Duration,
    work: F,
) -> T
where
    T: Default,
    F: Future<Output = Result<T, AnalyticsError>>,
{
    let outcome = match timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => Err(AnalyticsError::Timeout {
            seconds: limit.as_secs(),
        }),
    };

    match outcome {
        Ok(value) => value,
        Err(err) => {
            logger.error(
                context,
                &format!("Failed to compute {}: {err}", context.operation),
            );
            T::default()
        }
    }
}
