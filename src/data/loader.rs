use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};

use super::clean::MissingPolicy;
use super::model::{CountryTable, IncomeTable, Scenario, Table};
use crate::error::{LoadError, LoadResult};

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// Inclusive, zero-based column range given in spreadsheet letters ("B:AO").
///
/// The first column of the span holds the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub first: u32,
    pub last: u32,
}

impl ColumnSpan {
    pub fn parse(text: &str) -> LoadResult<Self> {
        let bad = || LoadError::ColumnSpan(text.to_string());
        let (a, b) = match text.split_once(':') {
            Some((a, b)) => (a, b),
            None => (text, text),
        };
        let first = column_index(a.trim()).ok_or_else(bad)?;
        let last = column_index(b.trim()).ok_or_else(bad)?;
        if last < first {
            return Err(bad());
        }
        Ok(ColumnSpan { first, last })
    }

    /// Number of columns after the index column.
    pub fn measure_count(&self) -> usize {
        (self.last - self.first) as usize
    }
}

/// "A" → 0, "Z" → 25, "AA" → 26.
fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0u32, |acc, ch| {
        let ch = ch.to_ascii_uppercase();
        if !ch.is_ascii_uppercase() {
            return None;
        }
        acc.checked_mul(26)?.checked_add(ch as u32 - 'A' as u32 + 1)
    })
    .map(|n| n - 1)
}

/// Which block of a worksheet to read.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSelection {
    pub sheet: String,
    /// Zero-based row holding the column headers; data starts below it.
    pub header_row: u32,
    pub columns: ColumnSpan,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one sheet whose rows are keyed by a country label.
///
/// Rows with an empty label are skipped. Headers are taken from the sheet;
/// blank headers become `column <n>`.
pub fn load_country_table(
    path: &Path,
    selection: &SheetSelection,
    policy: MissingPolicy,
) -> LoadResult<CountryTable> {
    let mut workbook = open_workbook(path)?;
    let range = sheet_range(&mut workbook, path, &selection.sheet)?;
    let grid = read_grid(&range, selection);

    let columns = grid
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| h.clone().unwrap_or_else(|| format!("column {}", i + 1)))
        .collect();

    let mut index = Vec::new();
    let mut cells = Vec::new();
    for row in grid.rows {
        let label = cell_text(row.key);
        if label.is_empty() {
            continue;
        }
        index.push(label);
        cells.push(row.values);
    }
    if index.is_empty() {
        return Err(LoadError::EmptySheet(selection.sheet.clone()));
    }

    let table = Table::new(&selection.sheet, index, columns, cells)?;
    let before = table.len();
    let table = policy.apply(table);
    log::info!(
        "Loaded sheet '{}': {} rows ({} after cleaning), columns {:?}",
        selection.sheet,
        before,
        table.len(),
        table.columns
    );
    Ok(table)
}

/// Load one table per sheet, rows keyed by income level.
///
/// The index text (e.g. `"67% of average wage"`) is turned into a number by
/// stripping `index_suffix`. Columns with a blank header are dropped.
pub fn load_scenarios(
    path: &Path,
    sheets: &[String],
    header_row: u32,
    columns: ColumnSpan,
    index_suffix: &str,
    policy: MissingPolicy,
) -> LoadResult<Vec<Scenario>> {
    let mut workbook = open_workbook(path)?;
    let mut scenarios = Vec::with_capacity(sheets.len());

    for sheet in sheets {
        let selection = SheetSelection {
            sheet: sheet.clone(),
            header_row,
            columns,
        };
        let range = sheet_range(&mut workbook, path, sheet)?;
        let table = read_income_table(&range, &selection, index_suffix)?;
        let table = policy.apply(table);
        log::info!(
            "Loaded scenario '{}': {} income levels x {} countries",
            sheet,
            table.len(),
            table.columns.len()
        );
        scenarios.push(Scenario {
            name: sheet.clone(),
            table,
        });
    }
    Ok(scenarios)
}

/// Turn an index label such as `"150% of average wage"` into `150.0`.
pub fn parse_income_level(text: &str, suffix: &str) -> Option<f64> {
    let trimmed = text.trim();
    let number = trimmed.strip_suffix(suffix).unwrap_or(trimmed);
    number.trim().parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Workbook helpers
// ---------------------------------------------------------------------------

fn open_workbook(path: &Path) -> LoadResult<Sheets<BufReader<File>>> {
    if !path.exists() {
        return Err(LoadError::MissingWorkbook(path.to_path_buf()));
    }
    open_workbook_auto(path).map_err(|source| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    })
}

fn sheet_range(
    workbook: &mut Sheets<BufReader<File>>,
    path: &Path,
    sheet: &str,
) -> LoadResult<Range<Data>> {
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(LoadError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        });
    }
    workbook
        .worksheet_range(sheet)
        .map_err(|source| LoadError::Workbook {
            path: path.to_path_buf(),
            source,
        })
}

struct GridRow<'a> {
    /// Zero-based sheet row.
    sheet_row: u32,
    key: Option<&'a Data>,
    values: Vec<Option<f64>>,
}

struct Grid<'a> {
    headers: Vec<Option<String>>,
    rows: Vec<GridRow<'a>>,
}

/// Read the header row and every data row of the selected column span.
///
/// Positions are absolute sheet coordinates, so leading blank rows and
/// columns of the sheet do not shift the selection.
fn read_grid<'a>(range: &'a Range<Data>, selection: &SheetSelection) -> Grid<'a> {
    let ColumnSpan { first, last } = selection.columns;
    let headers = (first + 1..=last)
        .map(|col| {
            let text = cell_text(range.get_value((selection.header_row, col)));
            (!text.is_empty()).then_some(text)
        })
        .collect();

    let end_row = range.end().map(|(row, _)| row).unwrap_or(0);
    let rows = (selection.header_row + 1..=end_row)
        .map(|row| GridRow {
            sheet_row: row,
            key: range.get_value((row, first)),
            values: (first + 1..=last)
                .map(|col| cell_number(range.get_value((row, col))))
                .collect(),
        })
        .collect();

    Grid { headers, rows }
}

fn read_income_table(
    range: &Range<Data>,
    selection: &SheetSelection,
    index_suffix: &str,
) -> LoadResult<IncomeTable> {
    let grid = read_grid(range, selection);

    let kept: Vec<(usize, String)> = grid
        .headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| match h {
            Some(name) => Some((i, name.clone())),
            None => {
                log::warn!(
                    "Sheet '{}': skipping column {} with a blank header",
                    selection.sheet,
                    selection.columns.first + 1 + i as u32 + 1
                );
                None
            }
        })
        .collect();

    let mut index = Vec::new();
    let mut cells = Vec::new();
    for row in grid.rows {
        let level = match row.key {
            None | Some(Data::Empty) => continue,
            Some(Data::Float(v)) => *v,
            Some(Data::Int(v)) => *v as f64,
            Some(Data::String(text)) if text.trim().is_empty() => continue,
            Some(Data::String(text)) => parse_income_level(text, index_suffix).ok_or_else(|| {
                LoadError::MalformedIndex {
                    sheet: selection.sheet.clone(),
                    row: row.sheet_row + 1,
                    text: text.clone(),
                }
            })?,
            Some(other) => {
                return Err(LoadError::MalformedIndex {
                    sheet: selection.sheet.clone(),
                    row: row.sheet_row + 1,
                    text: other.to_string(),
                })
            }
        };
        index.push(level);
        cells.push(kept.iter().map(|(i, _)| row.values[*i]).collect());
    }
    if index.is_empty() {
        return Err(LoadError::EmptySheet(selection.sheet.clone()));
    }

    let columns = kept.into_iter().map(|(_, name)| name).collect();
    Table::new(&selection.sheet, index, columns, cells)
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => f.to_string(),
        _ => String::new(),
    }
}

/// Numbers and numeric text are values; everything else is a gap.
fn cell_number(cell: Option<&Data>) -> Option<f64> {
    match cell? {
        Data::Float(v) => Some(*v),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
