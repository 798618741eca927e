use anyhow::{Context, Result};
use film_sync_config::Config;
use film_sync_models::{CollectionStats, Film};
use film_sync_sources::{FilmSource, HttpFetcher, LetterboxdScraper};
use std::path::Path;
use std::sync::Arc;
use crate::error::{StoreError, SyncError};
use crate::progress::{ProgressObserver, SyncReport};
use crate::store::FilmStore;
use crate::sync::SyncOrchestrator;

/// Source wired by [`FilmLibrary::open`].
pub type ProductionSource = LetterboxdScraper<HttpFetcher>;

/// Everything a host needs: sync a profile and read back the stored collection.
pub struct FilmLibrary<S> {
    orchestrator: SyncOrchestrator<S>,
    store: Arc<FilmStore>,
}

impl FilmLibrary<ProductionSource> {
    /// Production wiring from configuration: HTTP fetcher, Letterboxd scraper and the database at `database`.
    pub fn open(config: &Config, database: &Path) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.scraper).context("Failed to create HTTP client")?;
        let scraper = LetterboxdScraper::from_config(fetcher, &config.letterboxd, &config.scraper)
            .context("Invalid Letterboxd configuration")?;
        let store = FilmStore::open(database)
            .with_context(|| format!("Failed to open database at {}", database.display()))?;

        Ok(Self::new(scraper, Arc::new(store)).with_item_delay(config.scraper.item_delay()))
    }
}

impl<S: FilmSource> FilmLibrary<S> {
    pub fn new(source: S, store: Arc<FilmStore>) -> Self {
        Self {
            orchestrator: SyncOrchestrator::new(source, store.clone()),
            store,
        }
    }

    pub fn with_item_delay(mut self, delay: std::time::Duration) -> Self {
        self.orchestrator = self.orchestrator.with_item_delay(delay);
        self
    }

    pub fn with_progress(mut self, observer: ProgressObserver) -> Self {
        self.orchestrator = self.orchestrator.with_progress(observer);
        self
    }

    pub async fn sync(&self, username: &str) -> Result<SyncReport, SyncError> {
        self.orchestrator.sync(username).await
    }

    pub fn list_all(&self) -> Result<Vec<Film>, StoreError> {
        self.store.list_all()
    }

    pub fn search_by_title(&self, query: &str) -> Result<Vec<Film>, StoreError> {
        self.store.search_by_title(query)
    }

    pub fn filter_by_rating(&self, min: f64) -> Result<Vec<Film>, StoreError> {
        self.store.filter_by_rating(min)
    }

    pub fn filter_by_year(&self, year: u32) -> Result<Vec<Film>, StoreError> {
        self.store.filter_by_year(year)
    }

    pub fn stats(&self) -> Result<CollectionStats, StoreError> {
        self.store.stats()
    }

    pub fn store(&self) -> &FilmStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use film_sync_config::ScraperConfig;
    use film_sync_sources::testing::ScriptedFetcher;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_library_sync_then_read() {
        let base = "https://letterboxd.test";
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .with_page(
                    format!("{}/jane/films/page/1/", base),
                    r#"<li class="griditem" data-film-name="Heat" data-film-link="/film/heat-1995/">
                         <p class="poster-viewingdata"><span class="rating">★★★★½</span></p></li>"#,
                )
                .with_page(
                    format!("{}/film/heat-1995/", base),
                    r#"<span class="releasedate">1995</span>"#,
                ),
        );
        let scraper = LetterboxdScraper::new(fetcher, base, Duration::ZERO).unwrap();
        let library = FilmLibrary::new(scraper, Arc::new(FilmStore::open_memory().unwrap()))
            .with_item_delay(Duration::ZERO);

        let report = library.sync("jane").await.unwrap();
        assert_eq!(report.scraped, 1);

        assert_eq!(library.list_all().unwrap().len(), 1);
        assert_eq!(library.search_by_title("hea").unwrap()[0].source_id, "heat-1995");
        assert_eq!(library.filter_by_rating(4.5).unwrap().len(), 1);
        assert!(library.filter_by_rating(5.0).unwrap().is_empty());
        assert_eq!(library.filter_by_year(1995).unwrap().len(), 1);
        assert_eq!(library.stats().unwrap().total_films, 1);
    }

    #[test]
    fn test_open_from_config_creates_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("films.db");

        let config = Config {
            scraper: ScraperConfig::unpaced(),
            ..Config::default()
        };

        let library = FilmLibrary::open(&config, &path).unwrap();
        assert_eq!(library.store().count().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn test_open_rejects_invalid_base_url() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.letterboxd.base_url = "not a url".to_string();

        assert!(FilmLibrary::open(&config, &dir.path().join("films.db")).is_err());
    }
}
