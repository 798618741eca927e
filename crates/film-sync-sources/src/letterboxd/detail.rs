//! Detail page enrichment as an ordered pipeline of named extraction rules.
//!
//! Every rule reads its own region of the document and yields zero or more
//! [`FieldValue`]s. How a value lands on the [`Film`] is decided by the rule's
//! [`Precedence`], so the crew-section rules can replace the byline directors
//! regardless of what ran before them.

use film_sync_models::{split_names, Film, MAX_CAST, MAX_DIRECTORS, MAX_WRITERS};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::trace;
use super::extract::{int_from_text, rating_from_aggregate_text, runtime_from_text};
use super::{css, element_text};

static RELEASE_YEAR: LazyLock<Selector> = LazyLock::new(|| css("span.releasedate"));
static RUNTIME_FOOTER: LazyLock<Selector> = LazyLock::new(|| css("p.text-link.text-footer"));
static AGGREGATE_RATING: LazyLock<Selector> = LazyLock::new(|| css(r#"meta[name="twitter:data2"]"#));
static STRUCTURED_DATA: LazyLock<Selector> = LazyLock::new(|| css(r#"script[type="application/ld+json"]"#));
static DIRECTOR_BYLINE: LazyLock<Selector> = LazyLock::new(|| css("span.directorlist a"));
static CREW_TAB: LazyLock<Selector> = LazyLock::new(|| css("div#tab-crew"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| css("h3"));
static NAME_LINK: LazyLock<Selector> = LazyLock::new(|| css("a.text-slug"));
static CAST_LINK: LazyLock<Selector> = LazyLock::new(|| css("div.cast-list a.text-slug"));

const CAST_OVERFLOW_ID: &str = "has-cast-overflow";
const CDATA_OPEN: &str = "/* <![CDATA[ */";
const CDATA_CLOSE: &str = "/* ]]> */";

/// A single extracted value, tagged with the field it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    ReleaseYear(u32),
    Runtime(u32),
    PublicRating(f64),
    Poster(String),
    Directors(Vec<String>),
    Writers(Vec<String>),
    Cast(Vec<String>),
}

/// How a rule's value interacts with what is already on the film.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// Set only while the field is still empty.
    FillIfEmpty,
    /// Add names after any already present, up to the field's cap.
    Append,
    /// Replace the field whenever the rule found something.
    Authoritative,
}

pub struct ExtractionRule {
    pub name: &'static str,
    pub precedence: Precedence,
    extract: fn(&Html) -> Vec<FieldValue>,
}

impl ExtractionRule {
    pub fn extract(&self, document: &Html) -> Vec<FieldValue> {
        (self.extract)(document)
    }
}

impl std::fmt::Debug for ExtractionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionRule")
            .field("name", &self.name)
            .field("precedence", &self.precedence)
            .finish()
    }
}

/// Rules in application order.
pub static DETAIL_RULES: [ExtractionRule; 8] = [
    ExtractionRule { name: "release-year", precedence: Precedence::FillIfEmpty, extract: release_year },
    ExtractionRule { name: "runtime", precedence: Precedence::FillIfEmpty, extract: runtime },
    ExtractionRule { name: "public-rating", precedence: Precedence::FillIfEmpty, extract: public_rating },
    ExtractionRule { name: "poster", precedence: Precedence::FillIfEmpty, extract: poster },
    ExtractionRule { name: "director-byline", precedence: Precedence::Append, extract: director_byline },
    ExtractionRule { name: "crew-directors", precedence: Precedence::Authoritative, extract: crew_directors },
    ExtractionRule { name: "crew-writers", precedence: Precedence::Authoritative, extract: crew_writers },
    ExtractionRule { name: "cast", precedence: Precedence::FillIfEmpty, extract: cast },
];

/// Parse a detail page and run every rule against `film`.
pub fn enrich_from_html(html: &str, film: &mut Film) {
    let document = Html::parse_document(html);
    apply_rules(&DETAIL_RULES, &document, film);
}

pub fn apply_rules(rules: &[ExtractionRule], document: &Html, film: &mut Film) {
    for rule in rules {
        let values = rule.extract(document);
        if values.is_empty() {
            trace!(rule = rule.name, source_id = %film.source_id, "Rule matched nothing");
        }
        for value in values {
            apply_value(film, value, rule.precedence);
        }
    }
}

pub fn apply_value(film: &mut Film, value: FieldValue, precedence: Precedence) {
    match value {
        FieldValue::ReleaseYear(year) => set_number(&mut film.release_year, year, precedence),
        FieldValue::Runtime(minutes) => set_number(&mut film.runtime_minutes, minutes, precedence),
        FieldValue::PublicRating(rating) => {
            if precedence == Precedence::Authoritative || film.public_rating == 0.0 {
                film.public_rating = rating;
            }
        }
        FieldValue::Poster(url) => {
            if precedence == Precedence::Authoritative || film.poster_url.is_empty() {
                film.poster_url = url;
            }
        }
        FieldValue::Directors(names) => set_names(&mut film.director, &names, MAX_DIRECTORS, precedence),
        FieldValue::Writers(names) => set_names(&mut film.writers, &names, MAX_WRITERS, precedence),
        FieldValue::Cast(names) => set_names(&mut film.cast, &names, MAX_CAST, precedence),
    }
}

fn set_number(field: &mut u32, value: u32, precedence: Precedence) {
    if precedence == Precedence::Authoritative || *field == 0 {
        *field = value;
    }
}

fn set_names(field: &mut String, names: &[String], cap: usize, precedence: Precedence) {
    if names.is_empty() {
        return;
    }
    let joined = match precedence {
        Precedence::FillIfEmpty if !field.is_empty() => return,
        Precedence::FillIfEmpty | Precedence::Authoritative => {
            names.iter().take(cap).map(String::as_str).collect::<Vec<_>>().join(", ")
        }
        Precedence::Append => {
            let mut current = split_names(field);
            let room = cap.saturating_sub(current.len());
            current.extend(names.iter().take(room).map(String::as_str));
            current.join(", ")
        }
    };
    *field = joined;
}

fn release_year(document: &Html) -> Vec<FieldValue> {
    document
        .select(&RELEASE_YEAR)
        .filter_map(|el| u32::try_from(int_from_text(&element_text(&el))).ok())
        .filter(|year| *year > 0)
        .map(FieldValue::ReleaseYear)
        .collect()
}

fn runtime(document: &Html) -> Vec<FieldValue> {
    document
        .select(&RUNTIME_FOOTER)
        .map(|el| runtime_from_text(&element_text(&el)))
        .filter(|minutes| *minutes > 0)
        .map(FieldValue::Runtime)
        .collect()
}

fn public_rating(document: &Html) -> Vec<FieldValue> {
    document
        .select(&AGGREGATE_RATING)
        .filter_map(|el| el.value().attr("content"))
        .map(rating_from_aggregate_text)
        .filter(|rating| *rating > 0.0)
        .map(FieldValue::PublicRating)
        .collect()
}

fn poster(document: &Html) -> Vec<FieldValue> {
    document
        .select(&STRUCTURED_DATA)
        .filter_map(|el| poster_from_structured_data(&el.text().collect::<String>()))
        .map(FieldValue::Poster)
        .collect()
}

/// `image` from an ld+json block, which may be wrapped in CDATA comment markers.
fn poster_from_structured_data(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw.strip_prefix(CDATA_OPEN).unwrap_or(raw);
    let raw = raw.strip_suffix(CDATA_CLOSE).unwrap_or(raw);

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(data) => data
            .get("image")
            .and_then(|image| image.as_str())
            .filter(|image| !image.is_empty())
            .map(str::to_string),
        Err(e) => {
            trace!(error = %e, "Ignoring malformed structured data block");
            None
        }
    }
}

fn director_byline(document: &Html) -> Vec<FieldValue> {
    let names = linked_names(document.select(&DIRECTOR_BYLINE), usize::MAX);
    if names.is_empty() {
        Vec::new()
    } else {
        vec![FieldValue::Directors(names)]
    }
}

fn crew_directors(document: &Html) -> Vec<FieldValue> {
    crew_section(
        document,
        |heading| heading.contains("Director") && !heading.contains("Assistant") && !heading.contains("Original"),
        MAX_DIRECTORS,
    )
    .into_iter()
    .map(FieldValue::Directors)
    .collect()
}

fn crew_writers(document: &Html) -> Vec<FieldValue> {
    crew_section(
        document,
        |heading| {
            heading.contains("Writer")
                && !heading.contains("Original")
                && !heading.contains("Story")
                && !heading.contains("Screenplay")
        },
        MAX_WRITERS,
    )
    .into_iter()
    .map(FieldValue::Writers)
    .collect()
}

/// Names listed under each crew heading accepted by `wanted`, one list per heading.
fn crew_section(document: &Html, wanted: fn(&str) -> bool, cap: usize) -> Vec<Vec<String>> {
    document
        .select(&CREW_TAB)
        .flat_map(|tab| tab.select(&HEADING).collect::<Vec<_>>())
        .filter(|heading| wanted(&element_text(heading)))
        .filter_map(|heading| heading.next_siblings().find_map(ElementRef::wrap))
        .map(|block| linked_names(block.select(&NAME_LINK), cap))
        .filter(|names| !names.is_empty())
        .collect()
}

fn cast(document: &Html) -> Vec<FieldValue> {
    let names: Vec<String> = document
        .select(&CAST_LINK)
        .filter(|link| !is_cast_overflow(link))
        .map(|link| element_text(&link))
        .filter(|name| !name.is_empty())
        .take(MAX_CAST)
        .collect();
    if names.is_empty() {
        Vec::new()
    } else {
        vec![FieldValue::Cast(names)]
    }
}

fn is_cast_overflow(link: &ElementRef<'_>) -> bool {
    link.value().attr("id") == Some(CAST_OVERFLOW_ID)
        || element_text(link).to_lowercase().contains("show all")
}

fn linked_names<'a>(links: impl Iterator<Item = ElementRef<'a>>, cap: usize) -> Vec<String> {
    links
        .map(|link| element_text(&link))
        .filter(|name| !name.is_empty())
        .take(cap)
        .collect()
}
