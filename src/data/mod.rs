/// Data layer: table model and file loading.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .xlsx / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (first sheet only)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  named columns of cells
///   └──────────┘
///        │  numeric_column(name)
///        ▼
///   ┌────────────┐
///   │ ColumnData  │  cleaned f64 sequence, missing values dropped
///   └────────────┘
/// ```

pub mod loader;
pub mod model;
