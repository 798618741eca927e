pub mod traits;
pub mod error;
pub mod http;
pub mod pacing;
pub mod letterboxd;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use traits::{FilmSource, PageFetcher};
pub use error::SourceError;
pub use http::HttpFetcher;
pub use pacing::Pacer;
pub use letterboxd::LetterboxdScraper;
