pub mod film;
pub mod stats;

pub use film::{Film, MAX_CAST, MAX_DIRECTORS, MAX_WRITERS, split_names};
pub use stats::{CollectionStats, PersonCount, RuntimeBreakdown, YearCount};
