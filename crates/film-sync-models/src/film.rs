use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of directors kept on a film.
pub const MAX_DIRECTORS: usize = 5;
/// Maximum number of writers kept on a film.
pub const MAX_WRITERS: usize = 5;
/// Maximum number of cast members kept on a film.
pub const MAX_CAST: usize = 30;

/// A film from a user's watch history, the unit of persistence.
///
/// Name lists (`director`, `cast`, `writers`) are stored as comma-joined strings.
/// An empty string means nothing was extracted; they are never absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Film {
    pub source_id: String, // Dedup key derived from source_url
    pub title: String,
    pub release_year: u32, // 0 = unknown
    pub source_url: String,
    pub user_rating: f64,   // 0.5 steps, 0 = unrated
    pub public_rating: f64, // 0 = unknown
    pub runtime_minutes: u32, // 0 = unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>, // Set when the film is first stored
    pub poster_url: String,
    pub director: String,
    pub cast: String,
    pub writers: String,
}

impl Film {
    /// Minimal record as discovered on a listing page.
    pub fn from_listing(
        source_id: impl Into<String>,
        title: impl Into<String>,
        source_url: impl Into<String>,
        user_rating: f64,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            source_url: source_url.into(),
            user_rating,
            ..Self::default()
        }
    }

    pub fn is_rated(&self) -> bool {
        self.user_rating > 0.0
    }

    pub fn directors(&self) -> Vec<&str> {
        split_names(&self.director)
    }

    pub fn writer_names(&self) -> Vec<&str> {
        split_names(&self.writers)
    }

    pub fn cast_names(&self) -> Vec<&str> {
        split_names(&self.cast)
    }
}

/// Split a comma-joined name list, trimming names and dropping empty entries.
///
/// Names that themselves contain a comma cannot be told apart from two names.
pub fn split_names(joined: &str) -> Vec<&str> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
