//! Pure conversions from scraped text to typed values.
//!
//! None of these perform I/O. Apart from [`rating_from_symbol`], unparsable
//! input yields zero rather than an error: a missing value is not a failure.

use crate::error::SourceError;

const FILM_PATH_PREFIXES: [&str; 5] = [
    "https://letterboxd.com/film/",
    "http://letterboxd.com/film/",
    "https://www.letterboxd.com/film/",
    "http://www.letterboxd.com/film/",
    "/film/",
];

/// Map a half-star glyph sequence to its numeric rating.
pub fn rating_from_symbol(symbol: &str) -> Result<f64, SourceError> {
    let rating = match symbol {
        "½" => 0.5,
        "★" => 1.0,
        "★½" => 1.5,
        "★★" => 2.0,
        "★★½" => 2.5,
        "★★★" => 3.0,
        "★★★½" => 3.5,
        "★★★★" => 4.0,
        "★★★★½" => 4.5,
        "★★★★★" => 5.0,
        other => return Err(SourceError::UnknownSymbol(other.to_string())),
    };
    Ok(rating)
}

/// Derive the dedup key from a film URL.
/// `https://letterboxd.com/film/the-thing/` -> `the-thing`
pub fn identifier_from_url(url: &str) -> String {
    let path = FILM_PATH_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .unwrap_or(url);
    path.strip_suffix('/').unwrap_or(path).to_string()
}

/// Runtime in minutes from `"148 mins More"` or `"2h 28m"`; 0 when neither shape matches.
pub fn runtime_from_text(text: &str) -> u32 {
    let text = text.trim();

    if let Some(minutes) = text
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
    {
        return minutes;
    }

    if text.contains('h') && text.contains('m') {
        let hour_parts: Vec<&str> = text.split('h').collect();
        let hours = hour_parts
            .first()
            .and_then(|h| h.trim().parse::<u32>().ok())
            .unwrap_or(0);
        let minutes = hour_parts
            .last()
            .and_then(|rest| rest.split('m').next())
            .and_then(|m| m.trim().parse::<u32>().ok())
            .unwrap_or(0);
        return hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .unwrap_or(0);
    }

    0
}

pub fn float_from_text(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

pub fn int_from_text(text: &str) -> i64 {
    text.trim().parse().unwrap_or(0)
}

/// Aggregate rating from strings like `"4.55 out of 5"`; 0 when outside the 0-5 scale.
pub fn rating_from_aggregate_text(text: &str) -> f64 {
    text.split_whitespace()
        .next()
        .map(float_from_text)
        .filter(|rating| is_on_scale(*rating))
        .unwrap_or(0.0)
}

fn is_on_scale(rating: f64) -> bool {
    rating.is_finite() && (0.0..=5.0).contains(&rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_from_symbol_vocabulary() {
        let expected = [
            ("½", 0.5),
            ("★", 1.0),
            ("★½", 1.5),
            ("★★", 2.0),
            ("★★½", 2.5),
            ("★★★", 3.0),
            ("★★★½", 3.5),
            ("★★★★", 4.0),
            ("★★★★½", 4.5),
            ("★★★★★", 5.0),
        ];
        for (symbol, value) in expected {
            assert_eq!(rating_from_symbol(symbol).unwrap(), value, "symbol {}", symbol);
        }
    }

    #[test]
    fn test_rating_from_symbol_rejects_unknown() {
        for symbol in ["", "★★★★★★", "½★", "4", " ★"] {
            assert!(matches!(
                rating_from_symbol(symbol),
                Err(SourceError::UnknownSymbol(s)) if s == symbol
            ));
        }
    }

    #[test]
    fn test_identifier_from_url_protocol_variants() {
        let https = identifier_from_url("https://letterboxd.com/film/the-shawshank-redemption/");
        let http = identifier_from_url("http://letterboxd.com/film/the-shawshank-redemption/");
        assert_eq!(https, "the-shawshank-redemption");
        assert_eq!(http, https);
        assert_eq!(identifier_from_url("https://www.letterboxd.com/film/alien/"), "alien");
    }

    #[test]
    fn test_identifier_from_url_relative_and_bare() {
        assert_eq!(identifier_from_url("/film/paris-texas/"), "paris-texas");
        assert_eq!(identifier_from_url("paris-texas/"), "paris-texas");
        assert_eq!(identifier_from_url("paris-texas"), "paris-texas");
    }

    #[test]
    fn test_runtime_from_text() {
        assert_eq!(runtime_from_text("148 mins More"), 148);
        assert_eq!(runtime_from_text("  96\u{a0}mins   More at IMDb TMDb "), 96);
        assert_eq!(runtime_from_text("2h 28m"), 148);
        assert_eq!(runtime_from_text("1h 5m"), 65);
        assert_eq!(runtime_from_text("garbage"), 0);
        assert_eq!(runtime_from_text(""), 0);
        assert_eq!(runtime_from_text("71582789h 1m"), 0);
    }

    #[test]
    fn test_numeric_fallbacks() {
        assert_eq!(float_from_text(" 3.5 "), 3.5);
        assert_eq!(float_from_text("n/a"), 0.0);
        assert_eq!(int_from_text("1994\n"), 1994);
        assert_eq!(int_from_text("19x4"), 0);
    }

    #[test]
    fn test_rating_from_aggregate_text() {
        assert_eq!(rating_from_aggregate_text("4.55 out of 5"), 4.55);
        assert_eq!(rating_from_aggregate_text(""), 0.0);
        assert_eq!(rating_from_aggregate_text("unrated"), 0.0);
        assert_eq!(rating_from_aggregate_text("inf out of 5"), 0.0);
        assert_eq!(rating_from_aggregate_text("NaN out of 5"), 0.0);
        assert_eq!(rating_from_aggregate_text("7.2 out of 10"), 0.0);
    }
}
