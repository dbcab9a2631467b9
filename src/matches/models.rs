use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{AsRefStr, Display, EnumString};

/// Per-participant outcome of a match
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResultFlag {
    Winner,
    Loser,
    Drawer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub player_name: String,
    pub result_flag: ResultFlag,
    pub rating_delta: Option<i32>,
    /// Class picked for the match, free-form as recorded by the replay parser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl Participant {
    pub fn new(player_name: impl Into<String>, result_flag: ResultFlag) -> Self {
        Self {
            player_name: player_name.into(),
            result_flag,
            rating_delta: None,
            class: None,
        }
    }

    pub fn with_delta(mut self, delta: i32) -> Self {
        self.rating_delta = Some(delta);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn is_named(&self, player_name: &str) -> bool {
        self.player_name.to_lowercase() == player_name.to_lowercase()
    }
}

/// An archived match. Summary reads may leave `participants` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub category: String,
    #[serde(default)]
    pub duration_seconds: u32,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl MatchRecord {
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            category: category.into(),
            duration_seconds: 0,
            participants: Vec::new(),
        }
    }

    /// Calendar day (UTC) the match was played on
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    pub fn participant(&self, player_name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_named(player_name))
    }

    pub fn has_participant(&self, player_name: &str) -> bool {
        self.participant(player_name).is_some()
    }

    /// Team format such as `1v1` or `2v2`, counted from result flags
    pub fn team_format(&self) -> String {
        let winners = self
            .participants
            .iter()
            .filter(|p| p.result_flag == ResultFlag::Winner)
            .count();
        let losers = self
            .participants
            .iter()
            .filter(|p| p.result_flag == ResultFlag::Loser)
            .count();
        format!("{winners}v{losers}")
    }

    /// Copy without participant detail, as returned by match queries
    pub fn summary(&self) -> Self {
        Self {
            participants: Vec::new(),
            ..self.clone()
        }
    }

    /// Replay order: timestamp ascending, equal timestamps broken by id
    pub fn chronological(a: &MatchRecord, b: &MatchRecord) -> Ordering {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Filters accepted by `MatchLogStore::query_matches`.
///
/// Date bounds are inclusive UTC calendar days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub player: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: usize,
}

impl MatchQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            player: None,
            category: None,
            start_date: None,
            end_date: None,
            limit,
        }
    }

    pub fn matches(&self, record: &MatchRecord) -> bool {
        if let Some(category) = &self.category {
            if &record.category != category {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if record.day() < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.day() > end {
                return false;
            }
        }
        match &self.player {
            Some(player) => record.has_participant(player),
            None => true,
        }
    }
}
