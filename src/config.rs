use std::path::PathBuf;

use clap::Parser;

/// Interactive explorer for a movie dataset.
#[derive(Debug, Clone, Parser)]
#[command(name = "movie-dashboard", version, about, long_about = None)]
pub struct DashboardConfig {
    /// Dataset to open (.csv, .json or .parquet).
    #[arg(env = "MOVIE_DASHBOARD_DATA", default_value = "output.csv")]
    pub data: PathBuf,

    /// Number of movies shown in the top-N rankings.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    pub top_n: u16,

    /// Bucket count of the distribution histograms.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    pub bins: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from("output.csv"),
            top_n: 10,
            bins: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_parsed_defaults() {
        let parsed = DashboardConfig::try_parse_from(["movie-dashboard"]).unwrap();
        let default = DashboardConfig::default();
        // The env var may be set on the machine running the tests.
        if std::env::var_os("MOVIE_DASHBOARD_DATA").is_none() {
            assert_eq!(parsed.data, default.data);
        }
        assert_eq!((parsed.top_n, parsed.bins), (default.top_n, default.bins));
    }

    #[test]
    fn flags_override_defaults() {
        let parsed =
            DashboardConfig::try_parse_from(["movie-dashboard", "movies.parquet", "--top-n", "5", "--bins", "40"])
                .unwrap();
        assert_eq!(parsed.data, PathBuf::from("movies.parquet"));
        assert_eq!(parsed.top_n, 5);
        assert_eq!(parsed.bins, 40);
    }

    #[test]
    fn zero_bins_rejected() {
        assert!(DashboardConfig::try_parse_from(["movie-dashboard", "--bins", "0"]).is_err());
    }
}
