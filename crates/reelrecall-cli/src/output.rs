use clap::ValueEnum;
use comfy_table::{presets, modifiers, Attribute, Cell, CellAlignment, Table};
use film_sync_models::Film;
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "✓".green(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "success",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{}", msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "info",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => {
                println!("{} {}", "⚠".yellow(), msg.as_ref());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({
                    "type": "warning",
                    "message": msg.as_ref()
                }));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }

        self.print_json(data);
    }

    /// A film list as a table, or as a JSON array.
    pub fn films(&self, films: &[Film]) {
        match self.format {
            OutputFormat::Human => {
                if self.quiet {
                    return;
                }
                if films.is_empty() {
                    println!("{}", "No films found".bright_black());
                    return;
                }
                println!("{}", film_table(films));
                println!("{} film(s)", films.len());
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.json(&serde_json::to_value(films).unwrap_or_default());
            }
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Human => {
                println!("{}", data);
            }
        }
    }
}

/// Empty table with the house style and a bold header row.
pub fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

pub fn film_table(films: &[Film]) -> Table {
    let mut table = styled_table(&["Title", "Year", "Rating", "Avg", "Runtime", "Director", "Added"]);
    for film in films {
        table.add_row(vec![
            Cell::new(&film.title),
            Cell::new(or_dash(film.release_year > 0, film.release_year)).set_alignment(CellAlignment::Right),
            Cell::new(stars(film.user_rating)),
            Cell::new(or_dash(film.public_rating > 0.0, format!("{:.2}", film.public_rating)))
                .set_alignment(CellAlignment::Right),
            Cell::new(or_dash(film.runtime_minutes > 0, format!("{}m", film.runtime_minutes)))
                .set_alignment(CellAlignment::Right),
            Cell::new(&film.director),
            Cell::new(
                film.added_at
                    .map(|ts| ts.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
        ]);
    }
    table
}

/// Half-star glyphs for a 0.5-step rating; empty when unrated.
pub fn stars(rating: f64) -> String {
    let halves = (rating * 2.0).round().clamp(0.0, 10.0) as usize;
    let mut glyphs = "★".repeat(halves / 2);
    if halves % 2 == 1 {
        glyphs.push('½');
    }
    glyphs
}

fn or_dash(known: bool, value: impl ToString) -> String {
    if known {
        value.to_string()
    } else {
        "-".to_string()
    }
}
