// Public API - what other modules can use
pub use models::{MatchQuery, MatchRecord, Participant, ResultFlag};
pub use repository::{InMemoryMatchLogStore, MatchLogStore, PostgresMatchLogStore};

pub mod models;
pub mod repository;
