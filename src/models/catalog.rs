use serde::{Deserialize, Serialize};

/// Outcome of matching a series title against the TMDB catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStatus {
    Resolved,
    Unresolved,
}

/// A watched series, with TMDB attributes when the title matched
///
/// Invariant: `status == Unresolved` exactly when `tmdb_id` is `None`, and
/// all attribute fields are empty in that case. The constructors below are
/// the only way other modules build these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedItem {
    pub series_title: String,
    pub watch_count: u32,
    pub tmdb_id: Option<u64>,
    pub tmdb_name: Option<String>,
    /// Genre names in TMDB's order
    pub genres: Vec<String>,
    pub overview: Option<String>,
    pub status: ResolveStatus,
}

impl ResolvedItem {
    /// A title with no catalog match; a first-class state, not an error
    pub fn unresolved(series_title: String, watch_count: u32) -> Self {
        Self {
            series_title,
            watch_count,
            tmdb_id: None,
            tmdb_name: None,
            genres: Vec::new(),
            overview: None,
            status: ResolveStatus::Unresolved,
        }
    }

    pub fn resolved(
        series_title: String,
        watch_count: u32,
        tmdb_id: u64,
        tmdb_name: Option<String>,
        genres: Vec<String>,
        overview: Option<String>,
    ) -> Self {
        Self {
            series_title,
            watch_count,
            tmdb_id: Some(tmdb_id),
            tmdb_name,
            genres,
            overview,
            status: ResolveStatus::Resolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ResolveStatus::Resolved
    }
}

/// An unwatched series discovered via seed expansion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateItem {
    /// Unique within a candidate pool
    pub tmdb_id: u64,
    pub name: Option<String>,
    pub genres: Vec<String>,
    pub overview: Option<String>,
}

/// One recommendation in the final ranked output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedResult {
    pub tmdb_id: u64,
    pub name: Option<String>,
    pub genres: Vec<String>,
    /// Cosine similarity to the user profile, in [0, 1]
    pub score: f32,
    /// Service names the title streams on, set by the availability pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_on: Option<Vec<String>>,
}
