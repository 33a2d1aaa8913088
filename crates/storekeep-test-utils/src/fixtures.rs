//! Pre-configured test data.
//!
//! Small application-shaped records used across the facade tests, so the
//! tests exercise realistic nested payloads (timestamps, optionals)
//! instead of bare strings.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A session record as an application would cache it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub region: Option<String>,
}

impl SessionRecord {
    /// A deterministic sample record; `n` varies the identifiers.
    pub fn sample(n: u32) -> Self {
        Self {
            session_id: format!("sess-{n}"),
            user_id: format!("user-{n}"),
            started_at: Utc
                .with_ymd_and_hms(2026, 1, 15, 10, 30, 0)
                .single()
                .expect("valid fixture timestamp"),
            region: Some("eu-west-1".to_string()),
        }
    }
}

/// A leaderboard entry, small enough for list and set tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RankEntry {
    pub player: String,
    pub points: u32,
}

impl RankEntry {
    pub fn new(player: &str, points: u32) -> Self {
        Self {
            player: player.to_string(),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(SessionRecord::sample(1), SessionRecord::sample(1));
        assert_ne!(
            SessionRecord::sample(1).session_id,
            SessionRecord::sample(2).session_id
        );
    }
}
