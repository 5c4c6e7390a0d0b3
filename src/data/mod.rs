/// Data layer: loading, enrichment, filtering and aggregation.
///
/// Architecture:
/// ```text
///  day.csv / hour.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → DailyRecord / HourlyRecord  (cached by a DataProvider)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  enrich   │  codes → season / weather / year labels, day type, timestamp
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → borrowed daily + hourly views
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  named views + summary metrics, one set per render
///   └───────────┘
/// ```
///
/// Nothing in here depends on the UI.

pub mod aggregate;
pub mod enrich;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod fixtures;
