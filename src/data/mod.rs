/// Data layer: record store, loading, and the filter-and-aggregate pipeline.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, normalise Gender/Result → RecordStore
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordStore  │  Vec<Record>, age span (read-only)
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  age range + gender → filtered subset
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ views/correlation │  summary, scatter, trend, bars, heatmap, table
///   └──────────────────┘
/// ```

pub mod correlation;
pub mod filter;
pub mod loader;
pub mod model;
pub mod views;
