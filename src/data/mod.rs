/// Data layer: records, loading, region filtering and aggregation.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TemperatureDataset (bad rows skipped)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  continent + exclusions → region records
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  continent series (line chart), year slice (bar chart)
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
