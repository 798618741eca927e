use super::Workspace;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub enum FilmQuery {
    All,
    Title(String),
    MinRating(f64),
    Year(u32),
}

pub fn run_films(query: FilmQuery, workspace: &Workspace, output: &Output) -> Result<()> {
    if let FilmQuery::MinRating(min) = query {
        if !(0.0..=5.0).contains(&min) {
            return Err(eyre!("Rating must be between 0 and 5, got {}", min));
        }
    }

    let library = workspace.open_library()?;
    let films = match &query {
        FilmQuery::All => library.list_all(),
        FilmQuery::Title(title) => library.search_by_title(title),
        FilmQuery::MinRating(min) => library.filter_by_rating(*min),
        FilmQuery::Year(year) => library.filter_by_year(*year),
    }
    .map_err(|e| eyre!("Failed to read films: {}", e))?;

    tracing::debug!(count = films.len(), "Query complete");
    output.films(&films);
    Ok(())
}
