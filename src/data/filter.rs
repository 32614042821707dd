use std::collections::BTreeSet;

use super::model::{CategoryField, Movie, MovieTable, NumericField};

// ---------------------------------------------------------------------------
// Range predicate
// ---------------------------------------------------------------------------

/// Inclusive numeric range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter {
    pub min: f64,
    pub max: f64,
}

impl RangeFilter {
    /// Build a range, swapping the bounds if given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            RangeFilter { min: a, max: b }
        } else {
            RangeFilter { min: b, max: a }
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria: conjunction of optional predicates
// ---------------------------------------------------------------------------

/// A conjunction of independent predicates. Every predicate is optional and
/// an absent one passes every record, so `FilterCriteria::default()` is the
/// identity filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the movie name. Empty = no constraint.
    pub name_contains: Option<String>,
    /// Allowed genres. Empty = no constraint.
    pub genres: BTreeSet<String>,
    /// Allowed languages. Empty = no constraint.
    pub languages: BTreeSet<String>,
    pub year: Option<RangeFilter>,
    pub rating: Option<RangeFilter>,
    pub votes: Option<RangeFilter>,
}

impl FilterCriteria {
    pub fn with_name_contains(mut self, query: impl Into<String>) -> Self {
        self.name_contains = Some(query.into());
        self
    }

    pub fn with_categories<I, S>(mut self, field: CategoryField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = values.into_iter().map(Into::into).collect();
        match field {
            CategoryField::Genre => self.genres = set,
            CategoryField::Language => self.languages = set,
        }
        self
    }

    pub fn with_range(mut self, field: NumericField, min: f64, max: f64) -> Self {
        *self.range_slot(field) = Some(RangeFilter::new(min, max));
        self
    }

    /// The active range predicate for a numeric field.
    pub fn range(&self, field: NumericField) -> Option<RangeFilter> {
        match field {
            NumericField::Year => self.year,
            NumericField::Rating => self.rating,
            NumericField::Votes => self.votes,
        }
    }

    fn range_slot(&mut self, field: NumericField) -> &mut Option<RangeFilter> {
        match field {
            NumericField::Year => &mut self.year,
            NumericField::Rating => &mut self.rating,
            NumericField::Votes => &mut self.votes,
        }
    }

    pub fn categories(&self, field: CategoryField) -> &BTreeSet<String> {
        match field {
            CategoryField::Genre => &self.genres,
            CategoryField::Language => &self.languages,
        }
    }

    /// Lowercased search needle, `None` when the search predicate is inactive.
    fn needle(&self) -> Option<String> {
        self.name_contains
            .as_deref()
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Whether no predicate is active.
    pub fn is_pass_all(&self) -> bool {
        self.needle().is_none()
            && self.genres.is_empty()
            && self.languages.is_empty()
            && NumericField::ALL.iter().all(|f| self.range(*f).is_none())
    }

    /// Number of active predicates, shown next to the filter panel heading.
    pub fn active_count(&self) -> usize {
        usize::from(self.needle().is_some())
            + usize::from(!self.genres.is_empty())
            + usize::from(!self.languages.is_empty())
            + NumericField::ALL
                .iter()
                .filter(|f| self.range(**f).is_some())
                .count()
    }

    fn matches_with_needle(&self, movie: &Movie, needle: Option<&str>) -> bool {
        // Ranges and set membership first, the substring scan last.
        for field in NumericField::ALL {
            if let Some(range) = self.range(field) {
                match field.value(movie) {
                    Some(v) if range.contains(v) => {}
                    _ => return false,
                }
            }
        }
        for field in [CategoryField::Genre, CategoryField::Language] {
            let allowed = self.categories(field);
            if allowed.is_empty() {
                continue;
            }
            match field.value(movie) {
                Some(v) if allowed.contains(v) => {}
                _ => return false,
            }
        }
        match needle {
            None => true,
            Some(needle) => movie
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(needle)),
        }
    }
}

// ---------------------------------------------------------------------------
// Applying criteria to views
// ---------------------------------------------------------------------------

/// Narrow a view (row indices into `table`) to the rows passing `criteria`.
/// The relative order of `rows` is kept and the table is never touched.
pub fn apply(table: &MovieTable, rows: &[usize], criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_pass_all() {
        return rows.to_vec();
    }
    let needle = criteria.needle();
    rows.iter()
        .copied()
        .filter(|&i| {
            table
                .get(i)
                .is_some_and(|m| criteria.matches_with_needle(m, needle.as_deref()))
        })
        .collect()
}

/// Return indices of the records of `table` that pass all active predicates.
pub fn filtered_indices(table: &MovieTable, criteria: &FilterCriteria) -> Vec<usize> {
    apply(table, &table.all_rows(), criteria)
}
