//! Letter entity

use chrono::{DateTime, FixedOffset};
use crate::core::serde_helpers::null_as_default;
use serde::Deserialize;

/// Korea Standard Time, UTC+09:00. Seoul has not observed DST since 1988.
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Status value the portal uses for a delivered letter.
const STATUS_SENT: i64 = 1;

/// A letter from the correspondence history of a group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Letter {
    #[serde(rename = "letter_id", deserialize_with = "crate::core::serde_helpers::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: i64,
    #[serde(default, deserialize_with = "crate::core::serde_helpers::string_or_number")]
    pub trainee_id: String,
    /// Creation time in milliseconds since the Unix epoch
    #[serde(rename = "create_date", default, deserialize_with = "null_as_default")]
    pub timestamp_millis: i64,
}

impl Letter {
    /// Whether the portal reports the letter as delivered.
    pub fn is_sent(&self) -> bool {
        self.status == STATUS_SENT
    }

    /// Creation time in Seoul local time.
    ///
    /// Uses the fixed UTC+09:00 offset of Korea Standard Time, not the named
    /// `Asia/Seoul` zone. The two agree for every instant since 1988.
    ///
    /// Returns `None` when the timestamp is outside chrono's range.
    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(KST_OFFSET_SECS)?;
        DateTime::from_timestamp_millis(self.timestamp_millis).map(|utc| utc.with_timezone(&offset))
    }
}
