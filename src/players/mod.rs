// Public API - what other modules can use
pub use models::{PlayerCategoryStats, PlayerStats, DEFAULT_CATEGORY};
pub use repository::{InMemoryPlayerStatsStore, PlayerStatsStore, PostgresPlayerStatsStore};

pub mod models;
pub mod repository;
