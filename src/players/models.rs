use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category read when a per-player lookup names no category
pub const DEFAULT_CATEGORY: &str = "default";

/// Current aggregate standing of one player in one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCategoryStats {
    pub score: i32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games_played: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub categories: HashMap<String, PlayerCategoryStats>,
}

impl PlayerStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: HashMap::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>, stats: PlayerCategoryStats) -> Self {
        self.categories.insert(category.into(), stats);
        self
    }

    pub fn category(&self, category: Option<&str>) -> Option<&PlayerCategoryStats> {
        self.categories.get(category.unwrap_or(DEFAULT_CATEGORY))
    }
}
