use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading workbooks and decorative inputs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("workbook not found: {}", .0.display())]
    MissingWorkbook(PathBuf),

    #[error("failed to open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet '{sheet}' not found in {}", path.display())]
    MissingSheet { path: PathBuf, sheet: String },

    #[error("invalid column span '{0}' (expected letters like \"B:AO\")")]
    ColumnSpan(String),

    #[error("sheet '{sheet}', row {row}: malformed index label '{text}'")]
    MalformedIndex {
        sheet: String,
        row: u32,
        text: String,
    },

    #[error("sheet '{0}' has no data rows")]
    EmptySheet(String),

    #[error("table '{name}': row {row} has {found} cells, expected {expected}")]
    RowWidth {
        name: String,
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("logo file not found: {}", .0.display())]
    MissingLogo(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while deriving chart views from loaded tables.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("table has no rows")]
    EmptyTable,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("chart has no views")]
    NoViews,

    #[error("view '{view}' does not match the chart at trace '{trace}'")]
    ViewMismatch { view: String, trace: String },
}

pub type LoadResult<T> = Result<T, LoadError>;
pub type ChartResult<T> = Result<T, ChartError>;
