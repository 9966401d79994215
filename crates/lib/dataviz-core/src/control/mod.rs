use std::{error::Error, fmt};

use dataviz_store::models::{DataFile, ImageFile, Table};
use tracing::debug;

use crate::parsers::{CsvParseError, CsvTableParser};
use crate::render::RenderError;
use crate::store::{DataStore, StoreError};

pub mod correlation;
pub mod describe;
pub mod ranking;
pub mod resolve;

pub use describe::{ColumnDescriptor, DatasetReport};
pub use resolve::resolve_column;

#[derive(Debug)]
pub enum ControlError {
    /// Missing directory, missing file, or filesystem failure.
    Store(StoreError),
    /// The file exists but is not readable as a table.
    Load { filename: String, source: CsvParseError },
    MissingColumns { required: Vec<&'static str> },
    MissingGeographyColumn,
    ColumnNotFound { column: String, available: Vec<String> },
    NoValidData { analysis: &'static str },
    InvalidPlotKind(String),
    InvalidTopN(i64),
    Render(RenderError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Load { filename, source } => {
                write!(f, "Could not load '{filename}' as tabular data: {source}")
            }
            Self::MissingColumns { required } => {
                let quoted: Vec<String> = required.iter().map(|name| format!("'{name}'")).collect();
                write!(
                    f,
                    "Dataset must contain {} columns for correlation analysis.",
                    quoted.join(" and ")
                )
            }
            Self::MissingGeographyColumn => write!(
                f,
                "Dataset must contain 'geography' column for state comparison."
            ),
            Self::ColumnNotFound { column, available } => write!(
                f,
                "Column '{column}' not found in dataset. Available columns: {available:?}"
            ),
            Self::NoValidData { analysis } => {
                write!(f, "No valid data points found for {analysis}.")
            }
            Self::InvalidPlotKind(kind) => write!(
                f,
                "Invalid plot type '{kind}'. Use 'scatter' or 'heatmap'."
            ),
            Self::InvalidTopN(value) => {
                write!(f, "top_n must be greater than zero (got {value}).")
            }
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Load { source, .. } => Some(source),
            Self::Render(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<RenderError> for ControlError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

pub type ControlResult<T> = Result<T, ControlError>;

/// Entry point for every dataset query and chart render.
///
/// Holds only the two directory paths; each call re-reads from disk.
#[derive(Debug, Clone)]
pub struct DataVizControlPlane {
    store: DataStore,
}

impl DataVizControlPlane {
    #[must_use]
    pub const fn new(store: DataStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &DataStore {
        &self.store
    }

    /// Lists every regular file in the input directory.
    ///
    /// # Errors
    /// Returns `ControlError::Store` if the input directory is missing or unreadable.
    pub fn list_data_files(&self) -> ControlResult<Vec<DataFile>> {
        Ok(self.store.list_data_files()?)
    }

    /// Lists rendered images, newest first.
    ///
    /// # Errors
    /// Returns `ControlError::Store` if the output directory is missing or unreadable.
    pub fn list_generated_images(&self) -> ControlResult<Vec<ImageFile>> {
        Ok(self.store.list_images()?)
    }

    /// Loads a dataset from the input directory.
    ///
    /// # Errors
    /// Returns `ControlError::Store` when the file does not exist and
    /// `ControlError::Load` when it cannot be parsed.
    pub fn load_table(&self, filename: &str) -> ControlResult<Table> {
        let path = self.store.resolve_data_file(filename)?;
        let table = CsvTableParser::parse_file(&path).map_err(|source| ControlError::Load {
            filename: filename.to_string(),
            source,
        })?;
        debug!(
            filename,
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded dataset"
        );
        Ok(table)
    }
}
