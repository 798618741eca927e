use serde::{Deserialize, Serialize};
use crate::film::Film;

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Aggregate view over every stored film.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CollectionStats {
    pub total_films: u64,
    pub average_user_rating: f64,   // Over rated films only
    pub average_public_rating: f64, // Over films with a known public rating
    pub total_runtime_minutes: u64,
    pub films_by_year: Vec<YearCount>,
    pub top_rated: Vec<Film>,
    pub top_directors: Vec<PersonCount>,
    pub top_actors: Vec<PersonCount>,
    pub top_writers: Vec<PersonCount>,
}

impl CollectionStats {
    pub fn runtime_breakdown(&self) -> RuntimeBreakdown {
        RuntimeBreakdown::from_minutes(self.total_runtime_minutes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearCount {
    pub year: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonCount {
    pub name: String,
    pub film_count: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeBreakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl RuntimeBreakdown {
    pub fn from_minutes(total: u64) -> Self {
        Self {
            days: total / MINUTES_PER_DAY,
            hours: (total % MINUTES_PER_DAY) / 60,
            minutes: total % 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_breakdown() {
        let breakdown = RuntimeBreakdown::from_minutes(3 * MINUTES_PER_DAY + 2 * 60 + 7);
        assert_eq!(breakdown, RuntimeBreakdown { days: 3, hours: 2, minutes: 7 });
        assert_eq!(RuntimeBreakdown::from_minutes(0), RuntimeBreakdown { days: 0, hours: 0, minutes: 0 });
    }
}
