//! Aggregate statistics over the stored collection.

use film_sync_models::{split_names, CollectionStats, PersonCount, YearCount};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use crate::error::StoreError;
use crate::store::{query_films, FILM_COLUMNS};

/// Length of every ranked list in [`CollectionStats`].
pub const TOP_LIMIT: usize = 10;

pub(crate) fn collect(conn: &Connection) -> Result<CollectionStats, StoreError> {
    let total_films: i64 = conn.query_row("SELECT COUNT(*) FROM films", [], |row| row.get(0))?;
    let average_user_rating: f64 = conn.query_row(
        "SELECT COALESCE(AVG(user_rating), 0.0) FROM films WHERE user_rating > 0",
        [],
        |row| row.get(0),
    )?;
    let average_public_rating: f64 = conn.query_row(
        "SELECT COALESCE(AVG(public_rating), 0.0) FROM films WHERE public_rating > 0",
        [],
        |row| row.get(0),
    )?;
    let total_runtime_minutes: i64 = conn.query_row(
        "SELECT COALESCE(SUM(runtime_minutes), 0) FROM films",
        [],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT release_year, COUNT(*) AS films FROM films
         WHERE release_year > 0
         GROUP BY release_year
         ORDER BY films DESC, release_year DESC
         LIMIT ?1",
    )?;
    let films_by_year = stmt
        .query_map(params![TOP_LIMIT as i64], |row| {
            Ok(YearCount {
                year: row.get(0)?,
                count: row.get::<_, i64>(1)?.max(0) as u64,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let top_rated = query_films(
        conn,
        &format!(
            "SELECT {} FROM films WHERE user_rating > 0
             ORDER BY user_rating DESC, added_at DESC, rowid DESC
             LIMIT ?1",
            FILM_COLUMNS
        ),
        params![TOP_LIMIT as i64],
    )?;

    Ok(CollectionStats {
        total_films: total_films.max(0) as u64,
        average_user_rating,
        average_public_rating,
        total_runtime_minutes: total_runtime_minutes.max(0) as u64,
        films_by_year,
        top_rated,
        top_directors: top_people(&name_column(conn, "director")?, TOP_LIMIT),
        top_actors: top_people(&name_column(conn, "cast_members")?, TOP_LIMIT),
        top_writers: top_people(&name_column(conn, "writers")?, TOP_LIMIT),
    })
}

/// Non-empty values of one comma-joined name column.
fn name_column(conn: &Connection, column: &'static str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {column} FROM films WHERE {column} IS NOT NULL AND {column} != ''"
    ))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Count how many lists each name appears in, most frequent first, ties by name.
///
/// Names are compared exactly after trimming; a name repeated within one list counts once.
pub fn top_people(lists: &[String], limit: usize) -> Vec<PersonCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for list in lists {
        let mut names = split_names(list);
        names.sort_unstable();
        names.dedup();
        for name in names {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<PersonCount> = counts
        .into_iter()
        .map(|(name, film_count)| PersonCount {
            name: name.to_string(),
            film_count,
        })
        .collect();
    ranked.sort_by(|a, b| b.film_count.cmp(&a.film_count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(limit);
    ranked
}
