use super::Workspace;
use crate::output::{film_table, stars, styled_table, Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, CellAlignment};
use film_sync_models::{CollectionStats, PersonCount};
use owo_colors::OwoColorize;

pub fn run_stats(workspace: &Workspace, output: &Output) -> Result<()> {
    let library = workspace.open_library()?;
    let stats = library
        .stats()
        .map_err(|e| eyre!("Failed to compute statistics: {}", e))?;

    match output.format() {
        OutputFormat::Human => {
            if !output.is_quiet() {
                print_human(&stats);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let mut value = serde_json::to_value(&stats)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("runtime".to_string(), serde_json::to_value(stats.runtime_breakdown())?);
            }
            output.json(&value);
        }
    }
    Ok(())
}

fn print_human(stats: &CollectionStats) {
    if stats.total_films == 0 {
        println!("{}", "No films stored yet. Run 'reelrecall sync' first.".bright_black());
        return;
    }

    let runtime = stats.runtime_breakdown();
    let mut summary = styled_table(&["Collection", ""]);
    summary.add_row(vec![Cell::new("Films"), Cell::new(stats.total_films)]);
    summary.add_row(vec![
        Cell::new("Average rating"),
        Cell::new(format!("{:.2} {}", stats.average_user_rating, stars(stats.average_user_rating))),
    ]);
    summary.add_row(vec![
        Cell::new("Average public rating"),
        Cell::new(format!("{:.2}", stats.average_public_rating)),
    ]);
    summary.add_row(vec![
        Cell::new("Total runtime"),
        Cell::new(format!("{}d {}h {}m", runtime.days, runtime.hours, runtime.minutes)),
    ]);
    println!("{}", summary);

    if !stats.films_by_year.is_empty() {
        let mut years = styled_table(&["Year", "Films"]);
        for entry in &stats.films_by_year {
            years.add_row(vec![
                Cell::new(entry.year),
                Cell::new(entry.count).set_alignment(CellAlignment::Right),
            ]);
        }
        println!("\n{}", "Most watched years".bright_cyan().bold());
        println!("{}", years);
    }

    if !stats.top_rated.is_empty() {
        println!("\n{}", "Top rated".bright_cyan().bold());
        println!("{}", film_table(&stats.top_rated));
    }

    print_people("Top directors", &stats.top_directors);
    print_people("Top actors", &stats.top_actors);
    print_people("Top writers", &stats.top_writers);
}

fn print_people(title: &str, people: &[PersonCount]) {
    if people.is_empty() {
        return;
    }
    let mut table = styled_table(&["Name", "Films"]);
    for person in people {
        table.add_row(vec![
            Cell::new(&person.name),
            Cell::new(person.film_count).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\n{}", title.bright_cyan().bold());
    println!("{}", table);
}
