use film_sync_models::Film;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;
use super::extract::{identifier_from_url, rating_from_symbol};
use super::{css, element_text};

static TILE: LazyLock<Selector> = LazyLock::new(|| css("li.griditem"));
static ALT_NAME: LazyLock<Selector> = LazyLock::new(|| css("div.react-component[data-item-name]"));
static ALT_LINK: LazyLock<Selector> = LazyLock::new(|| css("div.react-component[data-item-link]"));
static RATING: LazyLock<Selector> = LazyLock::new(|| css("p.poster-viewingdata span.rating"));
static NEXT_PAGE: LazyLock<Selector> = LazyLock::new(|| css(r#"a[class="next"]"#));

/// Minimal records found on one listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub films: Vec<Film>,
    pub has_next: bool,
}

/// Parse a films listing page. Never fails: an unrecognised page is simply empty.
pub fn parse_listing_page(html: &str) -> ListingPage {
    let document = Html::parse_document(html);

    let films = document
        .select(&TILE)
        .enumerate()
        .filter_map(|(index, tile)| {
            let film = film_from_tile(&tile);
            if film.is_none() {
                debug!(tile = index, "Skipping listing tile without title or link");
            }
            film
        })
        .collect();

    ListingPage {
        films,
        has_next: document.select(&NEXT_PAGE).next().is_some(),
    }
}

fn film_from_tile(tile: &ElementRef<'_>) -> Option<Film> {
    let title = tile_attr(tile, "data-film-name", &ALT_NAME, "data-item-name")?;
    let link = tile_attr(tile, "data-film-link", &ALT_LINK, "data-item-link")?;

    let source_id = identifier_from_url(&link);
    if source_id.is_empty() {
        return None;
    }

    let rating = tile
        .select(&RATING)
        .next()
        .map(|span| element_text(&span))
        .filter(|text| !text.is_empty())
        .map(|text| {
            rating_from_symbol(&text).unwrap_or_else(|e| {
                debug!(%title, error = %e, "Treating unrecognised rating as unrated");
                0.0
            })
        })
        .unwrap_or(0.0);

    Some(Film::from_listing(source_id, title, link, rating))
}

/// Attribute on the tile itself, else the same value from the alternate markup child.
fn tile_attr(
    tile: &ElementRef<'_>,
    primary: &str,
    fallback: &Selector,
    fallback_attr: &str,
) -> Option<String> {
    let non_empty = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    non_empty(tile.value().attr(primary)).or_else(|| {
        tile.select(fallback)
            .find_map(|child| non_empty(child.value().attr(fallback_attr)))
    })
}
