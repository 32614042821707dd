use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::export::export_csv;
use crate::data::model::{CategoryField, NumericField};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filters");
        let active = state.criteria().active_count();
        if active > 0 {
            ui.label(RichText::new(format!("({active} active)")).weak());
        }
    });
    if ui.button("Reset all").clicked() {
        state.reset_filters();
    }
    ui.separator();

    if state.table.is_empty() {
        ui.label("The dataset has no rows.");
        return;
    }

    let mut changed = false;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in [CategoryField::Genre, CategoryField::Language] {
                category_filter(ui, state, field);
            }
            ui.separator();
            for field in NumericField::ALL {
                changed |= range_filter(ui, state, field);
            }
        });

    // Recompute the view after any slider change.
    if changed {
        state.refilter();
    }
}

/// Multi-select for one categorical column. An empty selection means
/// "every value".
fn category_filter(ui: &mut Ui, state: &mut AppState, field: CategoryField) {
    let all_values = state.table.categories(field).to_vec();
    let n_selected = state.controls.categories_mut(field).len();
    let header_text = if n_selected == 0 {
        format!("{field}  (all)")
    } else {
        format!("{field}  ({n_selected}/{})", all_values.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(field.column())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                state.clear_category(field);
            }
            for value in &all_values {
                let mut checked = state.controls.categories_mut(field).contains(value);
                let mut text = RichText::new(value);
                if field == CategoryField::Language {
                    text = text.color(state.language_colors.color_for(Some(value.as_str())));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_category(field, value);
                }
            }
        });
}

/// Min/max sliders over the observed extent of a numeric column.
/// Returns whether either bound moved.
fn range_filter(ui: &mut Ui, state: &mut AppState, field: NumericField) -> bool {
    let Some(range) = state.controls.ranges.get_mut(&field) else {
        return false;
    };
    let (lo, hi) = range.bounds;
    let mut changed = false;

    ui.strong(format!("{field} range"));
    let mut min_slider = Slider::new(&mut range.low, lo..=hi).text("min");
    let mut max_slider = Slider::new(&mut range.high, lo..=hi).text("max");
    if field.is_integral() {
        min_slider = min_slider.integer();
        max_slider = max_slider.integer();
    }
    if field == NumericField::Votes {
        min_slider = min_slider.logarithmic(true);
        max_slider = max_slider.logarithmic(true);
    }
    changed |= ui.add(min_slider).changed();
    changed |= ui.add(max_slider).changed();

    if range.low > range.high {
        std::mem::swap(&mut range.low, &mut range.high);
    }
    ui.add_space(6.0);
    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export filtered view…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}: {} movies loaded, {} visible",
            state
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            state.table.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered movies")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_movies.csv")
        .save_file();

    if let Some(path) = file {
        match export_csv(&path, &state.visible_movies()) {
            Ok(()) => {
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
