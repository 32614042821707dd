use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::loader::load_file;
use crate::data::model::{CategoryField, Movie, MovieTable, NumericField};

// ---------------------------------------------------------------------------
// Visualization modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visualization {
    TopByRating,
    TopByVotes,
    RatingDistribution,
    VotesDistribution,
    GenreCounts,
    VotesVsRating,
}

impl Visualization {
    pub const ALL: [Visualization; 6] = [
        Visualization::TopByRating,
        Visualization::TopByVotes,
        Visualization::RatingDistribution,
        Visualization::VotesDistribution,
        Visualization::GenreCounts,
        Visualization::VotesVsRating,
    ];

    pub fn title(self, top_n: usize) -> String {
        match self {
            Visualization::TopByRating => format!("Top {top_n} Movies by Rating"),
            Visualization::TopByVotes => format!("Top {top_n} Movies by Votes"),
            Visualization::RatingDistribution => "Rating Distribution".to_string(),
            Visualization::VotesDistribution => "Votes Distribution".to_string(),
            Visualization::GenreCounts => "Top Genres by Count".to_string(),
            Visualization::VotesVsRating => "Votes vs. Rating by Language".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// User controls
// ---------------------------------------------------------------------------

/// A min/max selector over the observed extent of a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeControl {
    pub low: f64,
    pub high: f64,
    /// Observed extent of the field in the loaded table.
    pub bounds: (f64, f64),
}

impl RangeControl {
    fn full(bounds: (f64, f64)) -> Self {
        RangeControl {
            low: bounds.0,
            high: bounds.1,
            bounds,
        }
    }

    /// A selector spanning the whole extent is not a constraint.
    pub fn is_full(&self) -> bool {
        self.low <= self.bounds.0 && self.high >= self.bounds.1
    }
}

/// Raw state of every filter widget. [`FilterCriteria`] is rebuilt from
/// this on each interaction.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    pub search: String,
    /// Whether the search box also narrows the view behind the charts.
    pub search_narrows_view: bool,
    pub genres: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub ranges: BTreeMap<NumericField, RangeControl>,
}

impl Controls {
    fn for_table(table: &MovieTable) -> Self {
        let ranges = NumericField::ALL
            .into_iter()
            .filter_map(|f| table.extent(f).map(|e| (f, RangeControl::full(e))))
            .collect();
        Controls {
            ranges,
            ..Default::default()
        }
    }

    pub fn categories_mut(&mut self, field: CategoryField) -> &mut BTreeSet<String> {
        match field {
            CategoryField::Genre => &mut self.genres,
            CategoryField::Language => &mut self.languages,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table; replaced wholesale by File → Open, never mutated.
    pub table: MovieTable,

    /// Where `table` was loaded from.
    pub source: PathBuf,

    pub controls: Controls,

    /// Rows passing the sidebar filters (recomputed on every change).
    pub visible_indices: Vec<usize>,

    /// Rows matching the search box over the whole table.
    pub search_indices: Vec<usize>,

    pub visualization: Visualization,

    /// Colours for the language encoding of the scatter plot.
    pub language_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, table: MovieTable, source: PathBuf) -> Self {
        let mut state = AppState {
            config,
            table: MovieTable::default(),
            source: PathBuf::new(),
            controls: Controls::default(),
            visible_indices: Vec::new(),
            search_indices: Vec::new(),
            visualization: Visualization::TopByRating,
            language_colors: ColorMap::default(),
            status_message: None,
        };
        state.set_table(table, source);
        state
    }

    /// Ingest a newly loaded table: reset controls and colours, show all rows.
    pub fn set_table(&mut self, table: MovieTable, source: PathBuf) {
        self.controls = Controls::for_table(&table);
        self.language_colors = ColorMap::new(table.categories(CategoryField::Language));
        self.visible_indices = table.all_rows();
        self.search_indices.clear();
        self.table = table;
        self.source = source;
        self.status_message = None;
    }

    /// Load another file; on failure keep the current table and report.
    pub fn open_file(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => self.set_table(table, path.to_path_buf()),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Build the sidebar criteria from the current controls.
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default()
            .with_categories(CategoryField::Genre, self.controls.genres.iter().cloned())
            .with_categories(CategoryField::Language, self.controls.languages.iter().cloned());
        for (field, range) in &self.controls.ranges {
            if !range.is_full() {
                criteria = criteria.with_range(*field, range.low, range.high);
            }
        }
        if self.controls.search_narrows_view && !self.controls.search.trim().is_empty() {
            criteria = criteria.with_name_contains(self.controls.search.trim());
        }
        criteria
    }

    /// Recompute every derived view from the current controls.
    pub fn refilter(&mut self) {
        let criteria = self.criteria();
        self.visible_indices = filtered_indices(&self.table, &criteria);

        let query = self.controls.search.trim();
        self.search_indices = if query.is_empty() {
            Vec::new()
        } else {
            filtered_indices(&self.table, &FilterCriteria::default().with_name_contains(query))
        };

        log::debug!(
            "{} active filter(s): {} of {} movies visible, {} search hit(s)",
            criteria.active_count(),
            self.visible_indices.len(),
            self.table.len(),
            self.search_indices.len()
        );
    }

    /// Toggle a single category value in a multi-select.
    pub fn toggle_category(&mut self, field: CategoryField, value: &str) {
        let selected = self.controls.categories_mut(field);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Empty a multi-select, which removes its constraint.
    pub fn clear_category(&mut self, field: CategoryField) {
        self.controls.categories_mut(field).clear();
        self.refilter();
    }

    /// Put every control back to its pass-all position.
    pub fn reset_filters(&mut self) {
        self.controls = Controls::for_table(&self.table);
        self.refilter();
    }

    pub fn visible_movies(&self) -> Vec<&Movie> {
        self.table.select(&self.visible_indices)
    }

    pub fn search_results(&self) -> Vec<&Movie> {
        self.table.select(&self.search_indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;

    fn state() -> AppState {
        AppState::new(DashboardConfig::default(), sample_table(), PathBuf::from("sample.csv"))
    }

    #[test]
    fn fresh_state_shows_everything() {
        let s = state();
        assert!(s.criteria().is_pass_all());
        assert_eq!(s.visible_indices, s.table.all_rows());
        assert!(s.search_indices.is_empty());
    }

    #[test]
    fn full_range_is_not_a_constraint() {
        let mut s = state();
        let year = s.controls.ranges.get_mut(&NumericField::Year).unwrap();
        assert_eq!(year.bounds, (1994.0, 2019.0));
        year.low = 2003.0;
        s.refilter();

        assert_eq!(s.criteria().range(NumericField::Year).map(|r| r.min), Some(2003.0));
        assert!(s.criteria().range(NumericField::Votes).is_none());
        assert_eq!(s.visible_indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn toggling_categories_narrows_and_restores() {
        let mut s = state();
        s.toggle_category(CategoryField::Genre, "Drama");
        assert_eq!(s.visible_indices, vec![0, 2, 3]);
        s.toggle_category(CategoryField::Language, "Malayalam");
        assert_eq!(s.visible_indices, vec![3]);
        s.toggle_category(CategoryField::Genre, "Drama");
        assert_eq!(s.visible_indices, vec![1, 3]);
        s.clear_category(CategoryField::Language);
        assert_eq!(s.visible_indices.len(), 5);
    }

    #[test]
    fn search_runs_over_the_whole_table() {
        let mut s = state();
        s.toggle_category(CategoryField::Genre, "Thriller");
        s.controls.search = "  NIGHTS ".into();
        s.refilter();
        assert_eq!(s.search_indices, vec![3]);
        assert_eq!(s.visible_indices, vec![1]);

        s.controls.search_narrows_view = true;
        s.refilter();
        assert!(s.visible_indices.is_empty());
    }

    #[test]
    fn reset_restores_identity_view() {
        let mut s = state();
        s.toggle_category(CategoryField::Language, "Hindi");
        s.controls.ranges.get_mut(&NumericField::Rating).unwrap().high = 8.0;
        s.reset_filters();
        assert!(s.criteria().is_pass_all());
        assert_eq!(s.visible_indices.len(), 5);
    }

    #[test]
    fn failed_open_keeps_current_table() {
        let mut s = state();
        s.open_file(Path::new("/definitely/not/here.csv"));
        assert_eq!(s.table.len(), 5);
        assert!(s.status_message.as_deref().is_some_and(|m| m.starts_with("Error:")));
    }
}
