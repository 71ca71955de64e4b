//! Data layer: workbook loading, gap cleaning and the table types.
//!
//! ```text
//!  .xlsx / .xls / .ods
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  sheet + column span → Table<K>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  clean   │  MissingPolicy: drop incomplete rows | interpolate
//!   └──────────┘
//!        │
//!        ▼
//!   CountryTable (rows = countries)
//!   Scenario { IncomeTable } (rows = income levels, one per sheet)
//! ```

pub mod clean;
pub mod loader;
pub mod model;
