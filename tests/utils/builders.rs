use chrono::{DateTime, TimeZone, Utc};

use community_stats::{MatchRecord, Participant, ResultFlag};

// ============================================================================
// Match Builders
// ============================================================================

/// Fluent builder for archived matches
pub struct MatchBuilder {
    record: MatchRecord,
}

impl MatchBuilder {
    /// A match played at 18:00 UTC on the given day
    pub fn on(id: &str, year: i32, month: u32, day: u32) -> Self {
        Self::at(id, Utc.with_ymd_and_hms(year, month, day, 18, 0, 0).unwrap())
    }

    pub fn at(id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            record: MatchRecord::new(id, timestamp, "ranked"),
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.record.category = category.to_string();
        self
    }

    pub fn lasting(mut self, seconds: u32) -> Self {
        self.record.duration_seconds = seconds;
        self
    }

    pub fn winner(self, name: &str, delta: i32) -> Self {
        self.player(Participant::new(name, ResultFlag::Winner).with_delta(delta))
    }

    pub fn loser(self, name: &str, delta: i32) -> Self {
        self.player(Participant::new(name, ResultFlag::Loser).with_delta(delta))
    }

    pub fn drawer(self, name: &str) -> Self {
        self.player(Participant::new(name, ResultFlag::Drawer).with_delta(0))
    }

    /// Participant recorded without a rating delta
    pub fn unrated(self, name: &str, flag: ResultFlag) -> Self {
        self.player(Participant::new(name, flag))
    }

    pub fn player(mut self, participant: Participant) -> Self {
        self.record.participants.push(participant);
        self
    }

    /// Gives every participant the same class
    pub fn all_playing(mut self, class: &str) -> Self {
        for participant in &mut self.record.participants {
            participant.class = Some(class.to_string());
        }
        self
    }

    pub fn build(self) -> MatchRecord {
        self.record
    }
}

/// Standard 1v1: `winner` gains `delta`, `loser` drops it
pub fn one_v_one(id: &str, day: u32, winner: &str, loser: &str, delta: i32) -> MatchRecord {
    MatchBuilder::on(id, 2024, 5, day)
        .winner(winner, delta)
        .loser(loser, -delta)
        .build()
}
