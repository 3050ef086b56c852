use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of raw viewing history
///
/// `watched_at` is `None` when the source row had no timestamp or the
/// timestamp did not parse; unknown timestamps sort after known ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchEvent {
    pub raw_title: String,
    pub watched_at: Option<DateTime<Utc>>,
}

/// All watch events for one canonical series title, summarized
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesAggregate {
    pub series_title: String,
    /// Number of watch events mapping to this series title
    pub watch_count: u32,
    /// Most recent parseable watch timestamp, if any
    pub last_watched: Option<DateTime<Utc>>,
}
