/// History Normalizer
///
/// Turns a raw viewing-history export (Netflix-style CSV) into ranked
/// per-series aggregates. Netflix encodes episode rows as
/// "Series: Season N: Episode Title", so series names are recovered with a
/// colon heuristic before grouping.
use std::collections::HashMap;
use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{SeriesAggregate, WatchEvent},
};

pub const DEFAULT_TOP_N: usize = 20;

const TITLE_COLUMNS: &[&str] = &["Title", "title"];
const DATE_COLUMNS: &[&str] = &["Date", "Start Time", "date", "start time"];

/// Season/episode markers that justify splitting on a single colon
const EPISODE_KEYWORDS: &[&str] = &["season", "episode", "series", "saison"];

/// Locates a column by name, exact matches first, then case-insensitive
fn pick_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    for &name in candidates {
        if let Some(idx) = headers.iter().position(|h| h.as_str() == name) {
            return Some(idx);
        }
    }

    for &name in candidates {
        if let Some(idx) = headers.iter().position(|h| h.eq_ignore_ascii_case(name)) {
            return Some(idx);
        }
    }

    None
}

/// Recovers the series name from a raw episode title
///
/// Two or more colons is the common episode format and always splits; a
/// single colon splits only when a season/episode keyword confirms the row
/// is an episode rather than a title that happens to contain a colon.
pub fn series_title(raw_title: &str) -> String {
    let t = raw_title.trim();

    let colon_count = t.matches(':').count();
    if colon_count >= 2 {
        return t.split(':').next().unwrap_or(t).trim().to_string();
    }

    if colon_count == 1 {
        let lowered = t.to_lowercase();
        if EPISODE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return t.split(':').next().unwrap_or(t).trim().to_string();
        }
    }

    t.to_string()
}

/// Best-effort timestamp parsing over the formats seen in history exports
///
/// Anything unparseable becomes the explicit unknown sentinel (`None`), not
/// an error and not an epoch-zero stand-in.
pub fn parse_watched_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%m/%d/%y %H:%M", "%m/%d/%Y %H:%M"];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%d/%m/%Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

/// Reads a viewing-history CSV into watch events
///
/// Column discovery tolerates export variants: the title column falls back
/// to the first column when no recognized name is present; the timestamp
/// column is optional. Fails only when the input has no columns at all.
pub fn load_history<R: Read>(reader: R) -> AppResult<Vec<WatchEvent>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        return Err(AppError::Schema(
            "history input has no columns".to_string(),
        ));
    }

    let title_col = pick_column(&headers, TITLE_COLUMNS).unwrap_or(0);
    let date_col = pick_column(&headers, DATE_COLUMNS);

    let mut events = Vec::new();
    for record in csv_reader.records() {
        let record = record?;

        let raw_title = match record.get(title_col) {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => continue,
        };

        let watched_at = date_col
            .and_then(|idx| record.get(idx))
            .and_then(parse_watched_at);

        events.push(WatchEvent {
            raw_title,
            watched_at,
        });
    }

    tracing::info!(events = events.len(), "Viewing history loaded");

    Ok(events)
}

/// Groups watch events by canonical series title and ranks the result
///
/// Ordering is descending by (watch_count, last_watched), unknown timestamps
/// last; equal keys keep first-seen title order. Truncated to `top_n`.
pub fn summarize(events: &[WatchEvent], top_n: usize) -> Vec<SeriesAggregate> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut aggregates: Vec<SeriesAggregate> = Vec::new();

    for event in events {
        let title = series_title(&event.raw_title);

        match index.get(&title) {
            Some(&pos) => {
                let aggregate = &mut aggregates[pos];
                aggregate.watch_count += 1;
                if event.watched_at > aggregate.last_watched {
                    aggregate.last_watched = event.watched_at;
                }
            }
            None => {
                index.insert(title.clone(), aggregates.len());
                aggregates.push(SeriesAggregate {
                    series_title: title,
                    watch_count: 1,
                    last_watched: event.watched_at,
                });
            }
        }
    }

    // Stable sort preserves first-seen order among equal keys.
    // Option<DateTime> orders None below Some, so unknown timestamps sort last.
    aggregates.sort_by(|a, b| {
        b.watch_count
            .cmp(&a.watch_count)
            .then(b.last_watched.cmp(&a.last_watched))
    });

    aggregates.truncate(top_n);
    aggregates
}
