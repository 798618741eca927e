use async_trait::async_trait;
use film_sync_models::Film;
use std::sync::Arc;
use crate::error::SourceError;

/// Retrieves raw HTML documents.
///
/// Implementations must report transport errors and non-success statuses as
/// [`SourceError::FetchFailed`]; an empty body is a valid document.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        (**self).fetch(url).await
    }
}

/// A site that exposes a user's watched films in two passes:
/// a coarse listing, then one detail page per film.
#[async_trait]
pub trait FilmSource: Send + Sync {
    // Source metadata
    fn source_name(&self) -> &str;

    /// Walk every listing page for `username` and return minimal records in listing order.
    /// Any page failure aborts the walk; partial listings are never returned.
    async fn list_films(&self, username: &str) -> Result<Vec<Film>, SourceError>;

    /// Fetch the detail page for `film` and fill in whatever can be extracted.
    /// Only a failed fetch is an error; missing markup leaves fields at their defaults.
    async fn enrich(&self, film: &mut Film) -> Result<(), SourceError>;
}
