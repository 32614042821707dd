//! Writes a deterministic sample movie dataset as `sample_movies.csv` and
//! `sample_movies.parquet`, including a sprinkling of malformed cells so the
//! dashboard's missing-value handling has something to show.

use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::print_batches;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 600;

const GENRES: [&str; 8] = [
    "Drama", "Action", "Comedy", "Thriller", "Romance", "Crime", "Horror", "Family",
];
const LANGUAGES: [&str; 8] = [
    "Hindi", "Tamil", "Telugu", "Malayalam", "Kannada", "Bengali", "Marathi", "English",
];
const ADJECTIVES: [&str; 12] = [
    "Silent", "Golden", "Broken", "Last", "Hidden", "Burning", "Endless", "Little", "Midnight",
    "Lost", "Wild", "Second",
];
const NOUNS: [&str; 12] = [
    "River", "Monsoon", "Kingdom", "Promise", "Letter", "Highway", "Village", "Song", "Shadow",
    "Harbour", "Festival", "Journey",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct SampleMovie {
    name: String,
    year: i64,
    genre: &'static str,
    rating: Option<f64>,
    votes: Option<i64>,
    language: &'static str,
}

fn generate(rng: &mut SimpleRng) -> Vec<SampleMovie> {
    (0..ROWS)
        .map(|i| {
            let name = format!("The {} {}", rng.pick(&ADJECTIVES), rng.pick(&NOUNS));
            let year = 1950 + (rng.next_u64() % 75) as i64;
            let rating = (rng.gauss(6.6, 1.1).clamp(1.0, 9.8) * 10.0).round() / 10.0;
            // Popularity spans four orders of magnitude.
            let votes = 10f64.powf(1.5 + rng.next_f64() * 4.5).round() as i64;
            SampleMovie {
                name,
                year,
                genre: rng.pick(&GENRES),
                rating: (i % 53 != 7).then_some(rating),
                votes: (i % 37 != 11).then_some(votes),
                language: rng.pick(&LANGUAGES),
            }
        })
        .collect()
}

fn write_csv(path: &str, movies: &[SampleMovie]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["Movie Name", "Year", "Genre", "Rating(10)", "Votes", "Language"])?;
    for (i, m) in movies.iter().enumerate() {
        let rating = m.rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| "N/A".to_string());
        // Mix plain and comma-grouped vote counts, as scraped sources do.
        let votes = match m.votes {
            Some(v) if i % 3 == 0 => group_thousands(v),
            Some(v) => v.to_string(),
            None => String::new(),
        };
        let year = m.year.to_string();
        writer.write_record([
            m.name.as_str(),
            year.as_str(),
            m.genre,
            rating.as_str(),
            votes.as_str(),
            m.language,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn group_thousands(v: i64) -> String {
    let digits = v.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn to_batch(movies: &[SampleMovie]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Movie Name", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Genre", DataType::Utf8, false),
        Field::new("Rating(10)", DataType::Float64, true),
        Field::new("Votes", DataType::Int64, true),
        Field::new("Language", DataType::Utf8, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(movies.iter().map(|m| m.name.as_str()))),
        Arc::new(Int64Array::from_iter_values(movies.iter().map(|m| m.year))),
        Arc::new(StringArray::from_iter_values(movies.iter().map(|m| m.genre))),
        Arc::new(Float64Array::from(movies.iter().map(|m| m.rating).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(movies.iter().map(|m| m.votes).collect::<Vec<_>>())),
        Arc::new(StringArray::from_iter_values(movies.iter().map(|m| m.language))),
    ];

    RecordBatch::try_new(schema, columns).context("building record batch")
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let movies = generate(&mut rng);

    let csv_path = "sample_movies.csv";
    write_csv(csv_path, &movies)?;

    let batch = to_batch(&movies)?;
    let parquet_path = "sample_movies.parquet";
    let file = File::create(parquet_path).with_context(|| format!("creating {parquet_path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    print_batches(&[batch.slice(0, 5)]).context("printing preview")?;
    println!("Wrote {} movies to {csv_path} and {parquet_path}", movies.len());
    Ok(())
}
