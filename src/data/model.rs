use std::cmp::Ordering;

use crate::error::{LoadError, LoadResult};

// ---------------------------------------------------------------------------
// Table – one worksheet after column selection
// ---------------------------------------------------------------------------

/// A rectangular block of numeric measures keyed by a row index.
///
/// `K` is the row key: a country label (`String`) or an income level
/// expressed as a percentage of the average wage (`f64`).
#[derive(Debug, Clone, PartialEq)]
pub struct Table<K> {
    /// Row keys, one per row of `cells`.
    pub index: Vec<K>,
    /// Column names in source order.
    pub columns: Vec<String>,
    /// Row-major cells; `None` marks a missing value.
    pub cells: Vec<Vec<Option<f64>>>,
}

/// Rows keyed by country name (measures are taxpayer types).
pub type CountryTable = Table<String>;

/// Rows keyed by income level (columns are countries).
pub type IncomeTable = Table<f64>;

impl<K> Table<K> {
    /// Build a table, checking that every row has one cell per column.
    pub fn new(
        name: &str,
        index: Vec<K>,
        columns: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    ) -> LoadResult<Self> {
        for (row, values) in cells.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(LoadError::RowWidth {
                    name: name.to_string(),
                    row,
                    found: values.len(),
                    expected: columns.len(),
                });
            }
        }
        if index.len() != cells.len() {
            return Err(LoadError::RowWidth {
                name: name.to_string(),
                row: index.len().min(cells.len()),
                found: index.len(),
                expected: cells.len(),
            });
        }
        Ok(Table {
            index,
            columns,
            cells,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, position: usize) -> Vec<Option<f64>> {
        self.cells.iter().map(|row| row[position]).collect()
    }

    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    /// Whether any cell is missing.
    pub fn has_gaps(&self) -> bool {
        self.cells.iter().flatten().any(Option::is_none)
    }

    /// Keep only rows where every measure is present.
    pub fn drop_incomplete_rows(self) -> Self {
        let (index, cells): (Vec<K>, Vec<Vec<Option<f64>>>) = self
            .index
            .into_iter()
            .zip(self.cells)
            .filter(|(_, row)| row.iter().all(Option::is_some))
            .unzip();
        Table {
            index,
            columns: self.columns,
            cells,
        }
    }

    /// Fill gaps column by column, treating rows as equally spaced.
    ///
    /// * interior gaps: linear between the nearest valid neighbours
    /// * trailing gaps: last valid value
    /// * leading gaps: left missing
    pub fn interpolate_linear(mut self) -> Self {
        for col in 0..self.columns.len() {
            let mut last_valid: Option<(usize, f64)> = None;
            let mut row = 0;
            while row < self.cells.len() {
                match self.cells[row][col] {
                    Some(v) => {
                        last_valid = Some((row, v));
                        row += 1;
                    }
                    None => {
                        let next_valid = (row + 1..self.cells.len())
                            .find_map(|r| self.cells[r][col].map(|v| (r, v)));
                        match (last_valid, next_valid) {
                            (Some((r0, v0)), Some((r1, v1))) => {
                                let span = (r1 - r0) as f64;
                                for r in row..r1 {
                                    let t = (r - r0) as f64 / span;
                                    self.cells[r][col] = Some(v0 + (v1 - v0) * t);
                                }
                                row = r1;
                            }
                            (Some((_, v0)), None) => {
                                for r in row..self.cells.len() {
                                    self.cells[r][col] = Some(v0);
                                }
                                row = self.cells.len();
                            }
                            (None, Some((r1, _))) => row = r1,
                            (None, None) => row = self.cells.len(),
                        }
                    }
                }
            }
        }
        self
    }

    /// Row positions ordered by descending value of `column`.
    ///
    /// Ties keep source order; missing values sort last.
    pub fn order_descending_by(&self, column: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| match (self.value(a, column), self.value(b, column)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        order
    }
}

impl Table<f64> {
    /// Smallest and largest row key.
    pub fn index_bounds(&self) -> Option<(f64, f64)> {
        self.index.iter().fold(None, |acc, &k| match acc {
            None => Some((k, k)),
            Some((lo, hi)) => Some((lo.min(k), hi.max(k))),
        })
    }
}

// ---------------------------------------------------------------------------
// Scenario – one household type of the income workbook
// ---------------------------------------------------------------------------

/// One sheet of the income workbook: a household type and its table.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub table: IncomeTable,
}

/// Overall income range across scenarios.
pub fn income_bounds(scenarios: &[Scenario]) -> Option<(f64, f64)> {
    scenarios
        .iter()
        .filter_map(|s| s.table.index_bounds())
        .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
}
