use std::cmp::Ordering;
use std::collections::HashMap;

use super::model::{CategoryField, Movie, NumericField};

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// First `n` records after a stable sort on `field`.
///
/// Descending unless `ascending`. Equal values keep their relative order from
/// `movies`; records missing the field always sort after every present value.
/// Fewer than `n` records yields all of them.
pub fn top_n<'a>(
    movies: &[&'a Movie],
    field: NumericField,
    n: usize,
    ascending: bool,
) -> Vec<&'a Movie> {
    let mut ranked = movies.to_vec();
    // `sort_by` is stable, which is what keeps ties in source order.
    ranked.sort_by(|a, b| match (field.value(a), field.value(b)) {
        (Some(x), Some(y)) if ascending => x.total_cmp(&y),
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked.truncate(n);
    ranked
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics over the present values of one numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; undefined for a single value.
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl Summary {
    /// Labelled rows in the conventional `describe()` order.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 8] {
        [
            ("count", Some(self.count as f64)),
            ("mean", Some(self.mean)),
            ("std", self.std),
            ("min", Some(self.min)),
            ("25%", Some(self.p25)),
            ("50%", Some(self.p50)),
            ("75%", Some(self.p75)),
            ("max", Some(self.max)),
        ]
    }
}

/// Present values of `field`, in view order.
pub fn numeric_values(movies: &[&Movie], field: NumericField) -> Vec<f64> {
    movies.iter().filter_map(|m| field.value(m)).collect()
}

/// Summarise `field` over `movies`. Missing values are skipped; `None` means
/// there is no data to summarise.
pub fn describe(movies: &[&Movie], field: NumericField) -> Option<Summary> {
    let mut values = numeric_values(movies, field);
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std_dev = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Some(Summary {
        count: n,
        mean,
        std: std_dev,
        min: values[0],
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.50),
        p75: quantile(&values, 0.75),
        max: values[n - 1],
    })
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Frequency counts
// ---------------------------------------------------------------------------

/// Count records per category, most frequent first. Equal counts keep the
/// order in which the categories were first seen. Missing values are skipped.
pub fn count_by(movies: &[&Movie], field: CategoryField) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for &movie in movies {
        let Some(value) = field.value(movie) else {
            continue;
        };
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(value, n)| (value.to_string(), n))
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// One histogram bucket covering `[start, end)`; the last bucket is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bucket {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Split the observed range of `field` into `bins` equal-width buckets.
pub fn histogram(movies: &[&Movie], field: NumericField, bins: usize) -> Vec<Bucket> {
    let values = numeric_values(movies, field);
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        return vec![Bucket {
            start: min,
            end: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bucket {
            start: min + width * i as f64,
            end: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Records with both coordinates present, paired with those coordinates.
pub fn scatter_points<'a>(
    movies: &[&'a Movie],
    x: NumericField,
    y: NumericField,
) -> Vec<(&'a Movie, f64, f64)> {
    movies
        .iter()
        .filter_map(|&m| Some((m, x.value(m)?, y.value(m)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::{movie, sample_table};

    fn names(movies: &[&Movie]) -> Vec<String> {
        movies.iter().map(|m| m.display_name().to_string()).collect()
    }

    #[test]
    fn top_n_sorts_descending_with_stable_ties() {
        let table = sample_table();
        let all = table.select(&table.all_rows());
        let top = top_n(&all, NumericField::Rating, 10, false);
        // 5 records, n=10: everything comes back, sorted.
        assert_eq!(
            names(&top),
            [
                "The Shawshank Redemption",
                "Anbe Sivam",
                "Kumbalangi Nights",
                "Drishyam",
                "Andhadhun",
            ]
        );
    }

    #[test]
    fn top_n_ascending_keeps_ties_in_source_order() {
        let table = sample_table();
        let all = table.select(&table.all_rows());
        let top = top_n(&all, NumericField::Rating, 3, true);
        assert_eq!(names(&top), ["Drishyam", "Andhadhun", "Anbe Sivam"]);
    }

    #[test]
    fn top_n_truncates_and_orders_by_value() {
        let shawshank = movie("Shawshank", 1994, "Drama", 9.3, 2_000_000, "English");
        let drishyam = movie("Drishyam", 2013, "Thriller", 8.2, 50_000, "Malayalam");
        let rows = vec![&drishyam, &shawshank];
        assert_eq!(names(&top_n(&rows, NumericField::Rating, 1, false)), ["Shawshank"]);
        assert!(top_n(&rows, NumericField::Votes, 0, false).is_empty());
    }

    #[test]
    fn missing_values_sort_last_both_ways() {
        let mut blank = movie("Blank", 2000, "Drama", 0.0, 0, "Hindi");
        blank.votes = None;
        let low = movie("Low", 2000, "Drama", 5.0, 10, "Hindi");
        let high = movie("High", 2000, "Drama", 5.0, 1_000, "Hindi");
        let rows = vec![&blank, &low, &high];

        assert_eq!(names(&top_n(&rows, NumericField::Votes, 3, false)), ["High", "Low", "Blank"]);
        assert_eq!(names(&top_n(&rows, NumericField::Votes, 3, true)), ["Low", "High", "Blank"]);
    }

    #[test]
    fn describe_matches_reference_statistics() {
        let table = sample_table();
        let all = table.select(&table.all_rows());
        let s = describe(&all, NumericField::Rating).expect("ratings present");

        assert_eq!(s.count, 5);
        assert!((s.mean - 8.58).abs() < 1e-9);
        assert!((s.std.unwrap() - 0.4494441010848846).abs() < 1e-9);
        assert_eq!(s.min, 8.2);
        assert_eq!(s.p25, 8.2);
        assert_eq!(s.p50, 8.6);
        assert_eq!(s.p75, 8.6);
        assert_eq!(s.max, 9.3);
    }

    #[test]
    fn describe_interpolates_quartiles() {
        let ms: Vec<Movie> = [1, 2, 3, 4]
            .iter()
            .map(|&v| movie("m", 2000, "Drama", 5.0, v, "Hindi"))
            .collect();
        let rows: Vec<&Movie> = ms.iter().collect();
        let s = describe(&rows, NumericField::Votes).unwrap();
        assert_eq!(s.p25, 1.75);
        assert_eq!(s.p50, 2.5);
        assert_eq!(s.p75, 3.25);
    }

    #[test]
    fn describe_signals_no_data() {
        assert_eq!(describe(&[], NumericField::Rating), None);

        let mut unrated = movie("Unrated", 2000, "Drama", 0.0, 0, "Hindi");
        unrated.rating = None;
        assert_eq!(describe(&[&unrated], NumericField::Rating), None);
    }

    #[test]
    fn describe_single_value_has_no_std() {
        let one = movie("One", 2000, "Drama", 7.0, 1, "Hindi");
        let s = describe(&[&one], NumericField::Rating).unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.std, None);
        assert_eq!(s.entries()[2], ("std", None));
    }

    #[test]
    fn count_by_orders_by_count_then_first_seen() {
        let ms = vec![
            movie("a", 2000, "Thriller", 5.0, 1, "Hindi"),
            movie("b", 2000, "Drama", 5.0, 1, "Hindi"),
            movie("c", 2000, "Drama", 5.0, 1, "Hindi"),
            movie("d", 2000, "Drama", 5.0, 1, "Tamil"),
            movie("e", 2000, "Comedy", 5.0, 1, "Tamil"),
        ];
        let rows: Vec<&Movie> = ms.iter().collect();
        assert_eq!(
            count_by(&rows, CategoryField::Genre),
            vec![
                ("Drama".to_string(), 3),
                ("Thriller".to_string(), 1),
                ("Comedy".to_string(), 1),
            ]
        );
        assert_eq!(
            count_by(&rows, CategoryField::Language),
            vec![("Hindi".to_string(), 3), ("Tamil".to_string(), 2)]
        );
    }

    #[test]
    fn histogram_covers_range_with_closed_last_bucket() {
        let ms: Vec<Movie> = [0.0, 1.0, 2.5, 5.0, 10.0]
            .iter()
            .map(|&r| movie("m", 2000, "Drama", r, 1, "Hindi"))
            .collect();
        let rows: Vec<&Movie> = ms.iter().collect();
        let buckets = histogram(&rows, NumericField::Rating, 4);

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets.iter().map(|b| b.count).collect::<Vec<_>>(), [2, 1, 1, 1]);
        assert_eq!(buckets[0].start, 0.0);
        assert_eq!(buckets[3].end, 10.0);
        assert_eq!(buckets[1].width(), 2.5);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        assert!(histogram(&[], NumericField::Votes, 20).is_empty());

        let a = movie("a", 2000, "Drama", 7.0, 5, "Hindi");
        let b = movie("b", 2000, "Drama", 7.0, 5, "Hindi");
        let buckets = histogram(&[&a, &b], NumericField::Votes, 20);
        assert_eq!(buckets, vec![Bucket { start: 5.0, end: 5.0, count: 2 }]);
    }

    #[test]
    fn scatter_skips_incomplete_records() {
        let mut no_votes = movie("nv", 2000, "Drama", 7.0, 0, "Hindi");
        no_votes.votes = None;
        let full = movie("full", 2000, "Drama", 6.5, 300, "Hindi");
        let pts = scatter_points(&[&no_votes, &full], NumericField::Votes, NumericField::Rating);
        assert_eq!(pts.len(), 1);
        assert_eq!((pts[0].1, pts[0].2), (300.0, 6.5));
    }
}
