/// Data layer: core types, loading, filtering, and aggregation.
///
/// Pipeline per user interaction:
/// ```text
///  appointments .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AppointmentTable (memoized per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + staff set → row indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  staff / DSS / daily / keyword counts
///   └───────────┘
/// ```
pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
