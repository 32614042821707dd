/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, coerce cells → MovieTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ MovieTable  │  Vec<Movie>, category + extent index (immutable)
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria (AND of predicates) → row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  top_n / describe / count_by / histogram
///   └──────────┘
/// ```

pub mod analysis;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
