use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{Movie, REQUIRED_COLUMNS};

/// Write `movies` as CSV with the source column headers, so an exported view
/// can be loaded back as a dataset. The header is written even for an empty
/// view.
pub fn write_csv<W: Write>(sink: W, movies: &[&Movie]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
    writer
        .write_record(REQUIRED_COLUMNS)
        .context("writing CSV header")?;
    for movie in movies {
        writer.serialize(movie).context("serializing movie row")?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

pub fn export_csv(path: &Path, movies: &[&Movie]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, movies)?;
    log::info!("Exported {} movies to {}", movies.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::read_csv;
    use crate::data::model::tests::movie;

    #[test]
    fn exported_view_loads_back() {
        let mut partial = movie("Kumbalangi Nights", 2019, "Drama", 8.6, 28_000, "Malayalam");
        partial.votes = None;
        let full = movie("Andhadhun", 2018, "Crime", 8.2, 95_000, "Hindi");

        let mut out = Vec::new();
        write_csv(&mut out, &[&full, &partial]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Movie Name,Year,Genre,Rating(10),Votes,Language\n"));

        let table = read_csv(text.as_bytes()).unwrap();
        assert_eq!(table.movies(), [full, partial]);
    }

    #[test]
    fn empty_view_exports_header_and_loads_back_empty() {
        let mut out = Vec::new();
        write_csv(&mut out, &[]).unwrap();
        assert_eq!(out, b"Movie Name,Year,Genre,Rating(10),Votes,Language\n");

        let table = read_csv(out.as_slice()).unwrap();
        assert!(table.is_empty());
    }
}
