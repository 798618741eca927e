use super::*;
use chrono::{Duration, TimeZone};
use tempfile::TempDir;

fn at(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, second).unwrap()
}

fn film(id: &str, title: &str) -> Film {
    Film::from_listing(id, title, format!("/film/{}/", id), 0.0)
}

fn ids(films: &[Film]) -> Vec<&str> {
    films.iter().map(|f| f.source_id.as_str()).collect()
}

#[test]
fn test_insert_then_exists() {
    let store = FilmStore::open_memory().unwrap();
    assert!(!store.exists("heat-1995").unwrap());

    store.insert(&film("heat-1995", "Heat")).unwrap();
    assert!(store.exists("heat-1995").unwrap());
    assert!(!store.exists("heat").unwrap());
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_duplicate_insert_is_constraint_violation() {
    let store = FilmStore::open_memory().unwrap();
    let mut first = film("heat-1995", "Heat");
    first.user_rating = 4.5;
    store.insert_at(&first, at(0)).unwrap();

    let second = film("heat-1995", "Heat (Director's Cut)");
    let err = store.insert_at(&second, at(5)).unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation { ref source_id } if source_id == "heat-1995"));

    let stored = store.list_all().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Heat");
    assert_eq!(stored[0].user_rating, 4.5);
    assert_eq!(stored[0].added_at, Some(at(0)));
}

#[test]
fn test_round_trip_preserves_fields() {
    let store = FilmStore::open_memory().unwrap();
    let original = Film {
        release_year: 1995,
        public_rating: 4.31,
        runtime_minutes: 170,
        poster_url: "https://a.ltrbxd.com/heat.jpg".to_string(),
        director: "Michael Mann".to_string(),
        cast: "Al Pacino, Robert De Niro".to_string(),
        writers: "Michael Mann".to_string(),
        ..Film::from_listing("heat-1995", "Heat", "/film/heat-1995/", 4.5)
    };
    store.insert_at(&original, at(1)).unwrap();

    let stored = store.list_all().unwrap().remove(0);
    assert_eq!(stored, Film { added_at: Some(at(1)), ..original });
}

#[test]
fn test_insert_stamps_added_at_now() {
    let store = FilmStore::open_memory().unwrap();
    let before = Utc::now();
    store.insert(&film("alien", "Alien")).unwrap();
    let after = Utc::now();

    let added = store.list_all().unwrap()[0].added_at.unwrap();
    // Stored at microsecond precision
    assert!(added >= before - Duration::microseconds(1));
    assert!(added <= after);
}

#[test]
fn test_null_columns_read_back_as_defaults() {
    let store = FilmStore::open_memory().unwrap();
    store
        .conn()
        .unwrap()
        .execute(
            "INSERT INTO films (source_id, title, source_url) VALUES ('bare', 'Bare', '/film/bare/')",
            [],
        )
        .unwrap();

    let bare = store.list_all().unwrap().remove(0);
    assert_eq!(bare.release_year, 0);
    assert_eq!(bare.user_rating, 0.0);
    assert_eq!(bare.director, "");
    assert_eq!(bare.cast, "");
    assert_eq!(bare.added_at, None);
}

#[test]
fn test_list_all_newest_first() {
    let store = FilmStore::open_memory().unwrap();
    store.insert_at(&film("older", "Older"), at(1)).unwrap();
    store.insert_at(&film("newer", "Newer"), at(2)).unwrap();
    assert_eq!(ids(&store.list_all().unwrap()), vec!["newer", "older"]);
}

#[test]
fn test_list_all_ties_break_by_insertion_order() {
    let store = FilmStore::open_memory().unwrap();
    store.insert_at(&film("first", "First"), at(1)).unwrap();
    store.insert_at(&film("second", "Second"), at(1)).unwrap();
    assert_eq!(ids(&store.list_all().unwrap()), vec!["second", "first"]);
}

#[test]
fn test_filter_by_rating() {
    let store = FilmStore::open_memory().unwrap();
    for (id, rating) in [("a", 3.0), ("b", 4.5), ("c", 4.0), ("d", 0.0)] {
        let mut f = film(id, id);
        f.user_rating = rating;
        store.insert(&f).unwrap();
    }

    assert_eq!(ids(&store.filter_by_rating(4.0).unwrap()), vec!["b", "c"]);
    assert_eq!(store.filter_by_rating(0.0).unwrap().len(), 4);
    assert!(store.filter_by_rating(5.0).unwrap().is_empty());
}

#[test]
fn test_filter_by_year() {
    let store = FilmStore::open_memory().unwrap();
    for (id, year, second) in [("heat", 1995, 1), ("se7en", 1995, 2), ("alien", 1979, 3)] {
        let mut f = film(id, id);
        f.release_year = year;
        store.insert_at(&f, at(second)).unwrap();
    }

    assert_eq!(ids(&store.filter_by_year(1995).unwrap()), vec!["se7en", "heat"]);
    assert!(store.filter_by_year(2020).unwrap().is_empty());
}

#[test]
fn test_search_by_title_case_insensitive_sorted() {
    let store = FilmStore::open_memory().unwrap();
    store.insert(&film("the-thing", "The Thing")).unwrap();
    store.insert(&film("alien", "Alien")).unwrap();
    store.insert(&film("aliens", "Aliens")).unwrap();

    let found = store.search_by_title("ALIEN").unwrap();
    assert_eq!(ids(&found), vec!["alien", "aliens"]);
    assert!(store.search_by_title("zzz").unwrap().is_empty());
}

#[test]
fn test_search_wildcards_are_not_escaped() {
    let store = FilmStore::open_memory().unwrap();
    store.insert(&film("alien", "Alien")).unwrap();
    store.insert(&film("heat", "Heat")).unwrap();

    assert_eq!(store.search_by_title("%").unwrap().len(), 2);
    assert_eq!(ids(&store.search_by_title("H_at").unwrap()), vec!["heat"]);
}

#[test]
fn test_clear_removes_everything() {
    let store = FilmStore::open_memory().unwrap();
    store.insert(&film("a", "A")).unwrap();
    store.insert(&film("b", "B")).unwrap();

    assert_eq!(store.clear().unwrap(), 2);
    assert_eq!(store.count().unwrap(), 0);
    assert!(!store.exists("a").unwrap());
}

#[test]
fn test_open_on_disk_persists_and_creates_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("films.db");

    {
        let store = FilmStore::open(&path).unwrap();
        store.insert(&film("heat", "Heat")).unwrap();
    }

    let reopened = FilmStore::open(&path).unwrap();
    assert!(reopened.exists("heat").unwrap());
    assert_eq!(schema_version(&reopened.conn().unwrap()).unwrap(), CURRENT_VERSION);
}

#[test]
fn test_open_rejects_newer_schema() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("films.db");
    {
        let store = FilmStore::open(&path).unwrap();
        store
            .conn()
            .unwrap()
            .execute("INSERT INTO schema_version (version) VALUES (?1)", [CURRENT_VERSION + 1])
            .unwrap();
    }

    assert!(matches!(
        FilmStore::open(&path),
        Err(StoreError::SchemaVersion { found, .. }) if found == CURRENT_VERSION + 1
    ));
}
