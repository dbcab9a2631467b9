use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Matches played on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDataPoint {
    pub date: NaiveDate,
    #[serde(rename = "games")]
    pub match_count: u32,
}

/// One point of a rating trajectory; the first point is the anchor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingHistoryPoint {
    pub date: NaiveDate,
    #[serde(rename = "elo")]
    pub rating: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRateSummary {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl WinRateSummary {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassTopPlayer {
    pub player_name: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub elo: i32,
}

/// Per-class aggregate. The shape is part of the API; nothing produces it yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStat {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub total_games: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub win_rate: f64,
    pub top_players: Vec<ClassTopPlayer>,
    pub updated_at: String,
}

/// Mean match duration for one day, in minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLengthDataPoint {
    pub date: NaiveDate,
    pub average_duration: f64,
}

/// Distinct players active in a calendar month; `date` is the first of the month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerActivityDataPoint {
    pub date: NaiveDate,
    pub players: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSelection {
    pub class_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassWinRate {
    pub class_name: String,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaSummary {
    pub activity: Vec<ActivityDataPoint>,
    pub game_length: Vec<GameLengthDataPoint>,
    pub player_activity: Vec<PlayerActivityDataPoint>,
    pub class_selection: Vec<ClassSelection>,
    pub class_win_rates: Vec<ClassWinRate>,
}

/// Caller-supplied filters. Dates stay raw strings until an aggregator
/// resolves them, so malformed input can fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilters {
    pub player: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub team_format: Option<String>,
}

impl StatsFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = Some(start_date.into());
        self
    }

    pub fn end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    pub fn between(self, start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        self.start_date(start_date).end_date(end_date)
    }

    pub fn team_format(mut self, team_format: impl Into<String>) -> Self {
        self.team_format = Some(team_format.into());
        self
    }
}

impl fmt::Display for StatsFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("player", &self.player),
            ("category", &self.category),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
            ("teamFormat", &self.team_format),
        ];
        let set: Vec<String> = fields
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{name}={v}")))
            .collect();
        if set.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", set.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_chart_field_names() {
        let point = ActivityDataPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            match_count: 3,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2024-01-02", "games": 3}));

        let rating = RatingHistoryPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            rating: 1010,
        };
        let json = serde_json::to_value(&rating).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2024-01-02", "elo": 1010}));
    }

    #[test]
    fn filters_display_only_set_fields() {
        let filters = StatsFilters::new().player("alice").category("duel");
        assert_eq!(filters.to_string(), "player=alice category=duel");
        assert_eq!(StatsFilters::new().to_string(), "none");
    }
}
