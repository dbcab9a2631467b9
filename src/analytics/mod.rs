// Public API - what other modules can use
pub use errors::AnalyticsError;
pub use handlers::router;
pub use logger::{AnalyticsLogger, LogContext, Operation, TracingLogger, COMPONENT};
pub use models::*;
pub use service::{AnalyticsService, AnalyticsServiceBuilder};
pub use types::AnalyticsParams;

// Aggregators
pub mod activity;
pub mod class_stats;
pub mod meta;
pub mod rating_history;
pub mod win_rate;

// Engine plumbing
mod context;
pub mod dates;
mod errors;
mod fail_soft;
mod handlers;
mod logger;
pub mod models;
pub mod service;
mod types;
