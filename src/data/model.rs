use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column headers of the source table
// ---------------------------------------------------------------------------

pub const NAME_COLUMN: &str = "Movie Name";
pub const YEAR_COLUMN: &str = "Year";
pub const GENRE_COLUMN: &str = "Genre";
pub const RATING_COLUMN: &str = "Rating(10)";
pub const VOTES_COLUMN: &str = "Votes";
pub const LANGUAGE_COLUMN: &str = "Language";

/// Every column the loader requires, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    NAME_COLUMN,
    YEAR_COLUMN,
    GENRE_COLUMN,
    RATING_COLUMN,
    VOTES_COLUMN,
    LANGUAGE_COLUMN,
];

// ---------------------------------------------------------------------------
// Movie – one row of the source table
// ---------------------------------------------------------------------------

/// A single movie record.
///
/// Every attribute is optional: `None` is the missing-value marker for a cell
/// that was empty or could not be coerced to the attribute's type at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Movie {
    #[serde(rename = "Movie Name")]
    pub name: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<i32>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    /// Always within `0.0..=10.0` when present.
    #[serde(rename = "Rating(10)")]
    pub rating: Option<f64>,
    #[serde(rename = "Votes")]
    pub votes: Option<u64>,
    #[serde(rename = "Language")]
    pub language: Option<String>,
}

impl Movie {
    /// Name for display, with a placeholder for a missing title.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<untitled>")
    }
}

// ---------------------------------------------------------------------------
// Typed field selectors
// ---------------------------------------------------------------------------

/// Numeric attributes usable in range filters, rankings and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    Year,
    Rating,
    Votes,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [NumericField::Year, NumericField::Rating, NumericField::Votes];

    /// Value of this field for `movie` as `f64`, `None` when missing.
    pub fn value(self, movie: &Movie) -> Option<f64> {
        match self {
            NumericField::Year => movie.year.map(f64::from),
            NumericField::Rating => movie.rating,
            NumericField::Votes => movie.votes.map(|v| v as f64),
        }
    }

    /// Source column header.
    pub fn column(self) -> &'static str {
        match self {
            NumericField::Year => YEAR_COLUMN,
            NumericField::Rating => RATING_COLUMN,
            NumericField::Votes => VOTES_COLUMN,
        }
    }

    /// Whether values of this field are whole numbers.
    pub fn is_integral(self) -> bool {
        !matches!(self, NumericField::Rating)
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Categorical attributes usable in set filters and frequency counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryField {
    Genre,
    Language,
}

impl CategoryField {
    pub fn value(self, movie: &Movie) -> Option<&str> {
        match self {
            CategoryField::Genre => movie.genre.as_deref(),
            CategoryField::Language => movie.language.as_deref(),
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            CategoryField::Genre => GENRE_COLUMN,
            CategoryField::Language => LANGUAGE_COLUMN,
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// MovieTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The immutable loaded table with indices pre-computed at load time.
///
/// Views over the table are plain `Vec<usize>` row indices; nothing ever
/// mutates the records once the table is built.
#[derive(Debug, Clone, Default)]
pub struct MovieTable {
    movies: Vec<Movie>,
    /// Distinct genres in first-seen order.
    genres: Vec<String>,
    /// Distinct languages in first-seen order.
    languages: Vec<String>,
    /// Observed (min, max) per numeric field, absent when no value is present.
    extents: BTreeMap<NumericField, (f64, f64)>,
}

impl MovieTable {
    /// Build category and extent indices from the loaded records.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let genres = distinct_in_order(&movies, CategoryField::Genre);
        let languages = distinct_in_order(&movies, CategoryField::Language);

        let mut extents: BTreeMap<NumericField, (f64, f64)> = BTreeMap::new();
        for movie in &movies {
            for field in NumericField::ALL {
                let Some(v) = field.value(movie) else {
                    continue;
                };
                extents
                    .entry(field)
                    .and_modify(|(lo, hi)| {
                        *lo = lo.min(v);
                        *hi = hi.max(v);
                    })
                    .or_insert((v, v));
            }
        }

        MovieTable {
            movies,
            genres,
            languages,
            extents,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    #[cfg(test)]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, row: usize) -> Option<&Movie> {
        self.movies.get(row)
    }

    /// The identity view: every row in source order.
    pub fn all_rows(&self) -> Vec<usize> {
        (0..self.movies.len()).collect()
    }

    /// Resolve a view into record references, preserving its order.
    /// Out-of-range indices are skipped.
    pub fn select(&self, rows: &[usize]) -> Vec<&Movie> {
        rows.iter().filter_map(|&i| self.movies.get(i)).collect()
    }

    /// Distinct values of a categorical field in first-seen order.
    pub fn categories(&self, field: CategoryField) -> &[String] {
        match field {
            CategoryField::Genre => &self.genres,
            CategoryField::Language => &self.languages,
        }
    }

    /// Observed `(min, max)` of a numeric field.
    pub fn extent(&self, field: NumericField) -> Option<(f64, f64)> {
        self.extents.get(&field).copied()
    }

    /// Count of records missing each attribute, for load diagnostics.
    pub fn missing_counts(&self) -> Vec<(&'static str, usize)> {
        let count = |pred: fn(&Movie) -> bool| self.movies.iter().filter(|m| pred(m)).count();
        vec![
            (NAME_COLUMN, count(|m| m.name.is_none())),
            (YEAR_COLUMN, count(|m| m.year.is_none())),
            (GENRE_COLUMN, count(|m| m.genre.is_none())),
            (RATING_COLUMN, count(|m| m.rating.is_none())),
            (VOTES_COLUMN, count(|m| m.votes.is_none())),
            (LANGUAGE_COLUMN, count(|m| m.language.is_none())),
        ]
    }
}

fn distinct_in_order(movies: &[Movie], field: CategoryField) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for movie in movies {
        if let Some(v) = field.value(movie) {
            if seen.insert(v) {
                out.push(v.to_string());
            }
        }
    }
    out
}
