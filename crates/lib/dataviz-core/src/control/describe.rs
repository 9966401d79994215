use std::fmt::{self, Write as _};

use dataviz_store::models::{ColumnType, Table, format_float};
use serde::{Deserialize, Serialize};

use crate::stats::Summary;

use super::{ControlResult, DataVizControlPlane};

const HEAD_ROWS: usize = 5;
const NO_NUMERIC_COLUMNS: &str = "No numeric columns found for statistical analysis.";

/// Type and missing-value count of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub inferred_type: ColumnType,
    pub null_count: usize,
}

/// Summary of a loaded dataset. `Display` renders the text report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetReport {
    pub filename: String,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnDescriptor>,
    /// First rows as a fixed-width block.
    pub head: String,
    /// Per numeric column statistics as a fixed-width block; `None` when the
    /// table has no numeric column.
    pub statistics: Option<String>,
}

impl DatasetReport {
    /// Builds the report for an already loaded table. Never fails.
    #[must_use]
    pub fn from_table(filename: &str, table: &Table) -> Self {
        let columns = table
            .columns()
            .iter()
            .map(|column| ColumnDescriptor {
                name: column.name().to_string(),
                inferred_type: column.dtype(),
                null_count: column.null_count(),
            })
            .collect();
        Self {
            filename: filename.to_string(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            columns,
            head: head_block(table, HEAD_ROWS),
            statistics: statistics_block(table),
        }
    }
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset: {}", self.filename)?;
        writeln!(
            f,
            "Shape: {} rows × {} columns",
            self.row_count, self.column_count
        )?;
        writeln!(f)?;
        writeln!(f, "Columns:")?;
        for column in &self.columns {
            writeln!(
                f,
                "  - {}: {} ({} null values)",
                column.name, column.inferred_type, column.null_count
            )?;
        }
        writeln!(f)?;
        writeln!(f, "First {HEAD_ROWS} rows:")?;
        writeln!(f, "{}", self.head)?;
        writeln!(f)?;
        writeln!(f, "Basic Statistics:")?;
        write!(
            f,
            "{}",
            self.statistics.as_deref().unwrap_or(NO_NUMERIC_COLUMNS)
        )
    }
}

impl DataVizControlPlane {
    /// Loads a dataset and summarizes it.
    ///
    /// # Errors
    /// Returns `ControlError` if the file is missing or cannot be parsed.
    pub fn describe_dataset(&self, filename: &str) -> ControlResult<DatasetReport> {
        let table = self.load_table(filename)?;
        Ok(DatasetReport::from_table(filename, &table))
    }
}

fn head_block(table: &Table, limit: usize) -> String {
    let headers: Vec<String> = table.column_names().into_iter().map(str::to_string).collect();
    let rows = table.row_count().min(limit);
    if rows == 0 {
        return format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            headers.join(", ")
        );
    }
    let index: Vec<String> = (0..rows).map(|row| row.to_string()).collect();
    let cells: Vec<Vec<String>> = (0..rows)
        .map(|row| {
            table
                .columns()
                .iter()
                .map(|column| column.get(row).map(ToString::to_string).unwrap_or_default())
                .collect()
        })
        .collect();
    fixed_width_block(&index, &headers, &cells)
}

fn statistics_block(table: &Table) -> Option<String> {
    let summaries: Vec<(String, Summary)> = table
        .numeric_columns()
        .map(|column| {
            (
                column.name().to_string(),
                Summary::from_values(&column.numeric_values()),
            )
        })
        .collect();
    if summaries.is_empty() {
        return None;
    }
    let headers: Vec<String> = summaries.iter().map(|(name, _)| name.clone()).collect();
    let index: Vec<String> = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        .iter()
        .map(|label| (*label).to_string())
        .collect();
    let stat = |pick: fn(&Summary) -> f64| -> Vec<String> {
        summaries
            .iter()
            .map(|(_, summary)| stat_cell(pick(summary)))
            .collect()
    };
    let cells = vec![
        stat(|s| s.count as f64),
        stat(|s| s.mean),
        stat(|s| s.std),
        stat(|s| s.min),
        stat(|s| s.q25),
        stat(|s| s.q50),
        stat(|s| s.q75),
        stat(|s| s.max),
    ];
    Some(fixed_width_block(&index, &headers, &cells))
}

fn stat_cell(value: f64) -> String {
    if value.is_nan() {
        format_float(value)
    } else {
        format!("{value:.6}")
    }
}

/// Lays out rows under a header: the index column left-aligned, every other
/// column right-aligned, columns separated by two spaces.
fn fixed_width_block(index: &[String], headers: &[String], rows: &[Vec<String>]) -> String {
    let index_width = index.iter().map(|label| label.chars().count()).max().unwrap_or(0);
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = write!(out, "{:index_width$}", "");
    for (header, width) in headers.iter().zip(&widths) {
        let _ = write!(out, "  {header:>width$}");
    }
    for (label, row) in index.iter().zip(rows) {
        out.push('\n');
        let _ = write!(out, "{label:<index_width$}");
        for (cell, width) in row.iter().zip(&widths) {
            let _ = write!(out, "  {cell:>width$}");
        }
    }
    out
}
