use eframe::egui::{self, ScrollArea, Ui};

use crate::data::analysis::{count_by, describe, histogram, scatter_points, top_n};
use crate::data::model::{CategoryField, Movie, NumericField};
use crate::state::{AppState, Visualization};
use crate::ui::plot::{self, no_data, ScatterPoint};
use crate::ui::table::{count_table, movie_table, summary_table, MovieColumn};

const TABLE_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Central panel: search, filtered table, visualizations
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Movies Analysis Dashboard");
            ui.add_space(8.0);

            search_section(ui, state);
            ui.separator();
            filtered_section(ui, state);
            ui.separator();
            visualization_section(ui, state);
        });
}

fn search_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Search for a Movie");
    let edit = egui::TextEdit::singleline(&mut state.controls.search)
        .hint_text("Enter a movie name (partial or full, case-insensitive)")
        .desired_width(420.0);
    let mut changed = ui.add(edit).changed();
    changed |= ui
        .checkbox(&mut state.controls.search_narrows_view, "Also narrow the filtered movies")
        .changed();
    if changed {
        state.refilter();
    }

    if state.controls.search.trim().is_empty() {
        return;
    }
    let results = state.search_results();
    if results.is_empty() {
        no_data(ui, "No movies found matching your query.");
    } else {
        ui.label(format!("Found {} movie(s):", results.len()));
        movie_table(ui, "search_results", &results, &MovieColumn::ALL, TABLE_HEIGHT);
    }
}

fn filtered_section(ui: &mut Ui, state: &AppState) {
    let movies = state.visible_movies();
    egui::CollapsingHeader::new(format!("Filtered Movies Data ({})", movies.len()))
        .id_salt("filtered_movies")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if movies.is_empty() {
                no_data(ui, "No movies match the current filters.");
            } else {
                movie_table(ui, "filtered_movies_table", &movies, &MovieColumn::ALL, TABLE_HEIGHT);
            }
        });
}

fn visualization_section(ui: &mut Ui, state: &mut AppState) {
    let top = usize::from(state.config.top_n);
    ui.strong("Visualizations");
    egui::ComboBox::from_id_salt("visualization")
        .selected_text(state.visualization.title(top))
        .width(300.0)
        .show_ui(ui, |ui: &mut Ui| {
            for v in Visualization::ALL {
                ui.selectable_value(&mut state.visualization, v, v.title(top));
            }
        });
    ui.add_space(6.0);
    ui.heading(state.visualization.title(top));

    let movies = state.visible_movies();
    if movies.is_empty() {
        no_data(ui, "No movies match the current filters, nothing to visualize.");
        return;
    }

    let bins = usize::from(state.config.bins);
    match state.visualization {
        Visualization::TopByRating => top_movies(ui, &movies, NumericField::Rating, top, false),
        Visualization::TopByVotes => top_movies(ui, &movies, NumericField::Votes, top, true),
        Visualization::RatingDistribution => distribution(ui, &movies, NumericField::Rating, bins, false),
        Visualization::VotesDistribution => distribution(ui, &movies, NumericField::Votes, bins, true),
        Visualization::GenreCounts => genre_counts(ui, &movies),
        Visualization::VotesVsRating => votes_vs_rating(ui, state, &movies, top),
    }
}

/// Ranked table plus a bar chart, or a pie chart of shares.
fn top_movies(ui: &mut Ui, movies: &[&Movie], field: NumericField, n: usize, as_pie: bool) {
    let ranked = top_n(movies, field, n, false);
    let items: Vec<(String, f64)> = ranked
        .iter()
        .filter_map(|m| Some((m.display_name().to_string(), field.value(m)?)))
        .collect();
    if items.is_empty() {
        no_data(ui, &format!("No {field} values in the filtered movies."));
        return;
    }

    let value_column = match field {
        NumericField::Votes => MovieColumn::Votes,
        NumericField::Year => MovieColumn::Year,
        NumericField::Rating => MovieColumn::Rating,
    };
    let columns = [MovieColumn::Name, value_column, MovieColumn::Year, MovieColumn::Genre];
    ui.label(format!("Table: Top {n} Movies by {field}"));
    movie_table(ui, "top_movies", &ranked, &columns, TABLE_HEIGHT);
    ui.add_space(8.0);

    if as_pie {
        ui.label("Share of votes among the most voted movies.");
        plot::pie_chart(ui, &items);
    } else {
        ui.label("The highest rated movies in the filtered data.");
        plot::bar_chart(ui, "top_movies_bar", &items, field.column());
    }
}

/// `describe()` summary plus a histogram.
fn distribution(ui: &mut Ui, movies: &[&Movie], field: NumericField, bins: usize, log_counts: bool) {
    let Some(summary) = describe(movies, field) else {
        no_data(ui, &format!("No {field} values in the filtered movies."));
        return;
    };
    ui.label(format!("Table: Summary of {field}"));
    summary_table(ui, "summary", &summary, field);
    ui.add_space(8.0);

    let buckets = histogram(movies, field, bins);
    plot::histogram(ui, "distribution", &buckets, field.column(), log_counts);
}

fn genre_counts(ui: &mut Ui, movies: &[&Movie]) {
    let counts = count_by(movies, CategoryField::Genre);
    if counts.is_empty() {
        no_data(ui, "No genres in the filtered movies.");
        return;
    }
    ui.label("Table: Count of Movies by Genre");
    count_table(ui, "genre_counts", CategoryField::Genre.column(), &counts, TABLE_HEIGHT);
    ui.add_space(8.0);

    let items: Vec<(String, f64)> = counts.iter().map(|(g, n)| (g.clone(), *n as f64)).collect();
    plot::bar_chart(ui, "genre_counts_bar", &items, "count");
}

fn votes_vs_rating(ui: &mut Ui, state: &AppState, movies: &[&Movie], sample: usize) {
    let head: Vec<&Movie> = movies.iter().take(sample).copied().collect();
    ui.label("Table: Sample Data for Votes and Ratings");
    movie_table(
        ui,
        "scatter_sample",
        &head,
        &[MovieColumn::Name, MovieColumn::Votes, MovieColumn::Rating, MovieColumn::Language],
        TABLE_HEIGHT,
    );
    ui.add_space(8.0);

    let points: Vec<ScatterPoint<'_>> = scatter_points(movies, NumericField::Votes, NumericField::Rating)
        .into_iter()
        .map(|(movie, x, y)| ScatterPoint {
            movie,
            x,
            y,
            group: CategoryField::Language.value(movie),
            size: x,
        })
        .collect();
    if points.is_empty() {
        no_data(ui, "No movies with both votes and rating to plot.");
        return;
    }
    plot::scatter_plot(
        ui,
        "votes_vs_rating",
        &points,
        &state.language_colors,
        (NumericField::Votes.column(), NumericField::Rating.column()),
    );
}
