use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::analysis::Summary;
use crate::data::model::{Movie, NumericField};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Cell formatting
// ---------------------------------------------------------------------------

const MISSING: &str = "n/a";

/// Group digits in threes: `2000000` → `"2,000,000"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a statistic of `field` the way its column reads in the table.
pub fn format_stat(label: &str, value: Option<f64>, field: NumericField) -> String {
    match value {
        None => MISSING.to_string(),
        Some(v) if label == "count" => format_count(v as u64),
        Some(v) if field == NumericField::Votes && matches!(label, "min" | "max") => {
            format_count(v as u64)
        }
        Some(v) => format!("{v:.2}"),
    }
}

// ---------------------------------------------------------------------------
// Movie tables
// ---------------------------------------------------------------------------

/// Columns a movie table can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieColumn {
    Name,
    Year,
    Genre,
    Rating,
    Votes,
    Language,
}

impl MovieColumn {
    pub const ALL: [MovieColumn; 6] = [
        MovieColumn::Name,
        MovieColumn::Year,
        MovieColumn::Genre,
        MovieColumn::Rating,
        MovieColumn::Votes,
        MovieColumn::Language,
    ];

    fn title(self) -> &'static str {
        match self {
            MovieColumn::Name => "Movie Name",
            MovieColumn::Year => "Year",
            MovieColumn::Genre => "Genre",
            MovieColumn::Rating => "Rating(10)",
            MovieColumn::Votes => "Votes",
            MovieColumn::Language => "Language",
        }
    }

    fn cell(self, movie: &Movie) -> String {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
        match self {
            MovieColumn::Name => text(&movie.name),
            MovieColumn::Year => movie.year.map_or_else(|| MISSING.to_string(), |y| y.to_string()),
            MovieColumn::Genre => text(&movie.genre),
            MovieColumn::Rating => movie
                .rating
                .map_or_else(|| MISSING.to_string(), |r| format!("{r:.1}")),
            MovieColumn::Votes => movie.votes.map_or_else(|| MISSING.to_string(), format_count),
            MovieColumn::Language => text(&movie.language),
        }
    }
}

/// Scrollable table of movies with the given columns.
pub fn movie_table(ui: &mut Ui, id: &str, movies: &[&Movie], columns: &[MovieColumn], max_height: f32) {
    ui.push_id(id, |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(max_height)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
        for col in columns {
            builder = match col {
                MovieColumn::Name => builder.column(Column::initial(260.0).at_least(80.0).clip(true)),
                _ => builder.column(Column::auto().at_least(60.0)),
            };
        }

        builder
            .header(HEADER_HEIGHT, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col.title());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, movies.len(), |mut row| {
                    let movie = movies[row.index()];
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(col.cell(movie));
                        });
                    }
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Aggregate tables
// ---------------------------------------------------------------------------

/// Two-column table of `describe()` statistics.
pub fn summary_table(ui: &mut Ui, id: &str, summary: &Summary, field: NumericField) {
    let entries = summary.entries();
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(60.0))
            .column(Column::auto().at_least(100.0))
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("Statistic");
                });
                header.col(|ui: &mut Ui| {
                    ui.strong(field.column());
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, entries.len(), |mut row| {
                    let (label, value) = entries[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(label);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format_stat(label, value, field));
                    });
                });
            });
    });
}

/// Two-column table of category frequencies.
pub fn count_table(ui: &mut Ui, id: &str, category: &str, counts: &[(String, usize)], max_height: f32) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(max_height)
            .column(Column::auto().at_least(120.0))
            .column(Column::auto().at_least(60.0))
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong(category);
                });
                header.col(|ui: &mut Ui| {
                    ui.strong("count");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, counts.len(), |mut row| {
                    let (value, n) = &counts[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(value);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format_count(*n as u64));
                    });
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::movie;

    #[test]
    fn counts_are_grouped_in_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(2_000_000), "2,000,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn cells_render_missing_values() {
        let mut m = movie("Drishyam", 2013, "Thriller", 8.24, 50_000, "Malayalam");
        assert_eq!(MovieColumn::Rating.cell(&m), "8.2");
        assert_eq!(MovieColumn::Votes.cell(&m), "50,000");
        m.year = None;
        m.genre = None;
        assert_eq!(MovieColumn::Year.cell(&m), MISSING);
        assert_eq!(MovieColumn::Genre.cell(&m), MISSING);
    }

    #[test]
    fn stats_format_per_field() {
        assert_eq!(format_stat("count", Some(1200.0), NumericField::Rating), "1,200");
        assert_eq!(format_stat("max", Some(2_000_000.0), NumericField::Votes), "2,000,000");
        assert_eq!(format_stat("mean", Some(8.576), NumericField::Rating), "8.58");
        assert_eq!(format_stat("std", None, NumericField::Rating), MISSING);
    }
}
