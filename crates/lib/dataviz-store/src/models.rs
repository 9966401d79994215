use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::schema::{make_comparison_file_name, make_correlation_file_name};

/// A single cell of a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Null cells and NaN floats both count as missing.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(value) => value.is_nan(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NaN"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{}", format_float(*value)),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

/// Formats a float the way a dataframe prints it: integral values keep a
/// trailing `.0`, NaN prints as `NaN`.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Inferred storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int64,
    Float64,
    Bool,
    Object,
}

impl ColumnType {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    values: Vec<CellValue>,
}

impl Column {
    #[must_use]
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn dtype(&self) -> ColumnType {
        self.dtype
    }

    #[must_use]
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<&CellValue> {
        self.values.get(row)
    }

    #[must_use]
    pub fn f64_at(&self, row: usize) -> Option<f64> {
        self.values.get(row).and_then(CellValue::as_f64)
    }

    #[must_use]
    pub fn is_null_at(&self, row: usize) -> bool {
        self.values.get(row).is_none_or(CellValue::is_null)
    }

    #[must_use]
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_null()).count()
    }

    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    /// Non-null numeric values in row order.
    #[must_use]
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    DuplicateColumn(String),
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn(name) => write!(f, "duplicate column name: {name}"),
            Self::RaggedColumn {
                column,
                expected,
                actual,
            } => write!(
                f,
                "column '{column}' has {actual} values, expected {expected}"
            ),
        }
    }
}

impl Error for TableError {}

/// An in-memory dataset: ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Builds a table, checking that names are unique and lengths agree.
    ///
    /// # Errors
    /// Returns `TableError` on a duplicate name or a column of the wrong length.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            if column.len() != row_count {
                return Err(TableError::RaggedColumn {
                    column: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns, row_count })
    }

    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Exact-name lookup.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// First column whose name matches ignoring case.
    #[must_use]
    pub fn column_ignore_case(&self, name: &str) -> Option<&Column> {
        let wanted = name.to_lowercase();
        self.columns
            .iter()
            .find(|column| column.name.to_lowercase() == wanted)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.is_numeric())
    }

    /// Row indices with no null in any of `columns`, in original order.
    #[must_use]
    pub fn complete_rows(&self, columns: &[&Column]) -> Vec<usize> {
        (0..self.row_count)
            .filter(|&row| columns.iter().all(|column| !column.is_null_at(row)))
            .collect()
    }
}

/// A file present in the input directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataFile {
    pub name: String,
    pub size_bytes: u64,
    /// Extension including the leading dot, empty when absent.
    pub extension: String,
}

impl DataFile {
    /// Size in mebibytes rounded to two decimals.
    #[must_use]
    pub fn size_mb(&self) -> f64 {
        round_to(self.size_bytes as f64 / (1024.0 * 1024.0), 2)
    }
}

/// A rendered chart found in the output directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Local>,
}

impl ImageFile {
    /// Size in kibibytes rounded to one decimal.
    #[must_use]
    pub fn size_kb(&self) -> f64 {
        round_to(self.size_bytes as f64 / 1024.0, 1)
    }
}

#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

/// Correlation chart flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Scatter,
    Heatmap,
}

impl PlotKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scatter => "scatter",
            Self::Heatmap => "heatmap",
        }
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlotKind(pub String);

impl fmt::Display for UnknownPlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown plot kind: {}", self.0)
    }
}

impl Error for UnknownPlotKind {}

impl FromStr for PlotKind {
    type Err = UnknownPlotKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "scatter" => Ok(Self::Scatter),
            "heatmap" => Ok(Self::Heatmap),
            other => Err(UnknownPlotKind(other.to_string())),
        }
    }
}

/// Normalized intent behind a rendering call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotRequest {
    Correlation {
        source_file: String,
        kind: PlotKind,
    },
    Ranking {
        source_file: String,
        /// Metric as the caller spelled it; the artifact name keeps that spelling.
        metric: String,
        top_n: usize,
    },
}

impl PlotRequest {
    #[must_use]
    pub fn source_file(&self) -> &str {
        match self {
            Self::Correlation { source_file, .. } | Self::Ranking { source_file, .. } => {
                source_file
            }
        }
    }

    /// Deterministic artifact file name; identical requests map to the same name.
    #[must_use]
    pub fn output_file_name(&self) -> String {
        match self {
            Self::Correlation { source_file, kind } => {
                make_correlation_file_name(source_file, kind.as_str())
            }
            Self::Ranking {
                source_file,
                metric,
                top_n,
            } => make_comparison_file_name(source_file, metric, *top_n),
        }
    }
}

/// Result of a successful render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlotArtifact {
    pub output_path: PathBuf,
    pub created_at: DateTime<Local>,
    pub size_bytes: u64,
}
