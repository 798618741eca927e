use async_trait::async_trait;
use film_sync_config::{LetterboxdConfig, ScraperConfig};
use film_sync_models::Film;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;
use crate::error::SourceError;
use crate::pacing::Pacer;
use crate::traits::{FilmSource, PageFetcher};
use super::detail::enrich_from_html;
use super::listing::parse_listing_page;

/// Two-pass Letterboxd scraper: paginated films listing, then one detail page per film.
pub struct LetterboxdScraper<F> {
    fetcher: F,
    base_url: Url,
    page_pacer: Pacer,
}

impl<F: PageFetcher> LetterboxdScraper<F> {
    pub fn new(fetcher: F, base_url: &str, page_delay: Duration) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url).map_err(|e| SourceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        Ok(Self {
            fetcher,
            base_url,
            page_pacer: Pacer::new(page_delay),
        })
    }

    pub fn from_config(
        fetcher: F,
        letterboxd: &LetterboxdConfig,
        scraper: &ScraperConfig,
    ) -> Result<Self, SourceError> {
        Self::new(fetcher, &letterboxd.base_url, scraper.page_delay())
    }

    /// `{base}/{user}/films/page/{n}/`
    pub fn listing_url(&self, username: &str, page: u32) -> String {
        format!(
            "{}/{}/films/page/{}/",
            self.base_url.as_str().trim_end_matches('/'),
            urlencoding::encode(username),
            page
        )
    }

    /// Stored film URLs are usually site-relative; resolve them against the base URL.
    pub fn detail_url(&self, source_url: &str) -> Result<String, SourceError> {
        if source_url.starts_with("http") {
            return Ok(source_url.to_string());
        }
        self.base_url
            .join(source_url)
            .map(String::from)
            .map_err(|e| SourceError::fetch_failed(source_url, format!("invalid film URL: {}", e)))
    }

    #[instrument(skip(self))]
    pub async fn list_films(&self, username: &str) -> Result<Vec<Film>, SourceError> {
        let mut films = Vec::new();
        let mut page = 1;

        loop {
            let url = self.listing_url(username, page);
            debug!(page, %url, "Fetching listing page");

            let html = self.fetcher.fetch(&url).await?;
            let listing = parse_listing_page(&html);
            debug!(page, found = listing.films.len(), has_next = listing.has_next, "Parsed listing page");
            films.extend(listing.films);

            if !listing.has_next {
                break;
            }

            page += 1;
            self.page_pacer.pace().await;
        }

        info!(pages = page, films = films.len(), "Listing walk complete");
        Ok(films)
    }

    pub async fn enrich(&self, film: &mut Film) -> Result<(), SourceError> {
        let url = self.detail_url(&film.source_url)?;
        let html = self.fetcher.fetch(&url).await?;
        enrich_from_html(&html, film);
        debug!(
            source_id = %film.source_id,
            year = film.release_year,
            runtime = film.runtime_minutes,
            "Enriched film"
        );
        Ok(())
    }
}

#[async_trait]
impl<F: PageFetcher> FilmSource for LetterboxdScraper<F> {
    fn source_name(&self) -> &str {
        "letterboxd"
    }

    async fn list_films(&self, username: &str) -> Result<Vec<Film>, SourceError> {
        LetterboxdScraper::list_films(self, username).await
    }

    async fn enrich(&self, film: &mut Film) -> Result<(), SourceError> {
        LetterboxdScraper::enrich(self, film).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedFetcher;
    use std::sync::Arc;

    const BASE: &str = "https://letterboxd.com";

    fn listing(tiles: &[(&str, &str)], has_next: bool) -> String {
        let tiles: String = tiles
            .iter()
            .map(|(title, link)| {
                format!(r#"<li class="griditem" data-film-name="{}" data-film-link="{}"></li>"#, title, link)
            })
            .collect();
        let next = if has_next { r#"<a class="next" href="next">Older</a>"# } else { "" };
        format!("<html><body><ul>{}</ul>{}</body></html>", tiles, next)
    }

    fn scraper(fetcher: Arc<ScriptedFetcher>) -> LetterboxdScraper<Arc<ScriptedFetcher>> {
        LetterboxdScraper::new(fetcher, BASE, Duration::ZERO).unwrap()
    }

    #[test]
    fn test_listing_url() {
        let scraper = scraper(Arc::new(ScriptedFetcher::new()));
        assert_eq!(scraper.listing_url("jane", 3), "https://letterboxd.com/jane/films/page/3/");
        assert_eq!(scraper.listing_url("a b", 1), "https://letterboxd.com/a%20b/films/page/1/");
    }

    #[test]
    fn test_detail_url_absolutizes_relative_links() {
        let scraper = scraper(Arc::new(ScriptedFetcher::new()));
        assert_eq!(scraper.detail_url("/film/heat-1995/").unwrap(), "https://letterboxd.com/film/heat-1995/");
        assert_eq!(
            scraper.detail_url("https://letterboxd.com/film/alien/").unwrap(),
            "https://letterboxd.com/film/alien/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = LetterboxdScraper::new(ScriptedFetcher::new(), "letterboxd", Duration::ZERO);
        assert!(matches!(result, Err(SourceError::InvalidBaseUrl { .. })));
    }

    #[tokio::test]
    async fn test_walk_follows_next_until_absent() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .with_page(format!("{}/jane/films/page/1/", BASE), listing(&[("Heat", "/film/heat-1995/")], true))
                .with_page(format!("{}/jane/films/page/2/", BASE), listing(&[("Alien", "/film/alien/")], true))
                .with_page(format!("{}/jane/films/page/3/", BASE), listing(&[], false))
                .with_page(format!("{}/jane/films/page/4/", BASE), listing(&[("Never", "/film/never/")], false)),
        );
        let films = scraper(fetcher.clone()).list_films("jane").await.unwrap();

        let ids: Vec<&str> = films.iter().map(|f| f.source_id.as_str()).collect();
        assert_eq!(ids, vec!["heat-1995", "alien"]);
        assert_eq!(fetcher.requests().len(), 3);
        assert!(!fetcher.was_requested(&format!("{}/jane/films/page/4/", BASE)));
    }

    #[tokio::test]
    async fn test_last_page_with_tiles_terminates() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .with_page(format!("{}/jane/films/page/1/", BASE), listing(&[("Heat", "/film/heat-1995/")], false)),
        );
        let films = scraper(fetcher.clone()).list_films("jane").await.unwrap();
        assert_eq!(films.len(), 1);
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_page_failure_aborts_walk() {
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .with_page(format!("{}/jane/films/page/1/", BASE), listing(&[("Heat", "/film/heat-1995/")], true))
                .with_failure(format!("{}/jane/films/page/2/", BASE)),
        );
        let result = scraper(fetcher).list_films("jane").await;
        assert!(matches!(result, Err(SourceError::FetchFailed { .. })));
    }

    #[tokio::test]
    async fn test_enrich_fetches_absolute_detail_url() {
        let fetcher = Arc::new(ScriptedFetcher::new().with_page(
            format!("{}/film/heat-1995/", BASE),
            r#"<html><body><span class="releasedate">1995</span></body></html>"#,
        ));
        let mut film = Film::from_listing("heat-1995", "Heat", "/film/heat-1995/", 0.0);
        scraper(fetcher).enrich(&mut film).await.unwrap();
        assert_eq!(film.release_year, 1995);
    }

    #[tokio::test]
    async fn test_enrich_failure_is_fetch_failed() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let mut film = Film::from_listing("heat-1995", "Heat", "/film/heat-1995/", 0.0);
        let err = scraper(fetcher).enrich(&mut film).await.unwrap_err();
        assert!(err.is_fetch_failure());
        assert_eq!(film.release_year, 0);
    }
}
