use std::collections::HashSet;
use std::{error::Error, fmt, path::Path};

use dataviz_store::models::{CellValue, Column, ColumnType, Table, TableError};
use dataviz_store::schema::{FALSE_TOKENS, TRUE_TOKENS, is_null_token};

/// Error type for CSV load failures.
#[derive(Debug)]
pub struct CsvParseError {
    message: String,
}

impl CsvParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CsvParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CSV parse error: {}", self.message)
    }
}

impl Error for CsvParseError {}

impl From<csv::Error> for CsvParseError {
    fn from(err: csv::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<std::io::Error> for CsvParseError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<TableError> for CsvParseError {
    fn from(err: TableError) -> Self {
        Self::new(err.to_string())
    }
}

/// Parser for comma separated files with a header row.
pub struct CsvTableParser;

impl CsvTableParser {
    /// Parses CSV text into a typed table.
    ///
    /// # Errors
    /// Returns `CsvParseError` if there is no header, a row has more fields
    /// than the header, or the input is not valid CSV.
    pub fn parse(text: &str) -> Result<Table, CsvParseError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        Self::parse_reader(reader)
    }

    /// Reads and parses a CSV file.
    ///
    /// # Errors
    /// Returns `CsvParseError` if the file cannot be read or parsed.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Table, CsvParseError> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path.as_ref())?;
        Self::parse_reader(reader)
    }

    fn parse_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Table, CsvParseError> {
        let headers = reader.headers()?.clone();
        if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
            return Err(CsvParseError::new("No columns to parse from file"));
        }
        let names = dedupe_headers(headers.iter());
        let width = names.len();

        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
        for (row_no, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > width {
                return Err(CsvParseError::new(format!(
                    "Expected {width} fields in line {}, saw {}",
                    row_no + 2,
                    record.len()
                )));
            }
            for (index, cells) in raw.iter_mut().enumerate() {
                let cell = record
                    .get(index)
                    .filter(|value| !is_null_token(value))
                    .map(str::to_string);
                cells.push(cell);
            }
        }

        let columns = names
            .into_iter()
            .zip(raw)
            .map(|(name, cells)| infer_column(name, cells))
            .collect();
        Ok(Table::new(columns)?)
    }
}

/// Blank headers become `Unnamed: {i}`; repeats become `name.1`, `name.2`, ...
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for (index, header) in headers.enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {index}")
        } else {
            header.to_string()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        names.push(candidate);
    }
    names
}

fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    if cells.is_empty() {
        return Column::new(name, ColumnType::Object, Vec::new());
    }
    let has_nulls = cells.iter().any(Option::is_none);
    let present: Vec<&str> = cells.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        return Column::new(name, ColumnType::Float64, vec![CellValue::Null; cells.len()]);
    }

    if present.iter().all(|value| value.trim().parse::<i64>().is_ok()) {
        let as_float = has_nulls;
        let values = cells
            .iter()
            .map(|cell| match cell.as_deref().map(|value| value.trim().parse::<i64>()) {
                Some(Ok(value)) if as_float => CellValue::Float(value as f64),
                Some(Ok(value)) => CellValue::Int(value),
                _ => CellValue::Null,
            })
            .collect();
        let dtype = if as_float {
            ColumnType::Float64
        } else {
            ColumnType::Int64
        };
        return Column::new(name, dtype, values);
    }

    if present.iter().all(|value| value.trim().parse::<f64>().is_ok()) {
        let values = cells
            .iter()
            .map(|cell| {
                cell.as_deref()
                    .and_then(|value| value.trim().parse::<f64>().ok())
                    .map_or(CellValue::Null, CellValue::Float)
            })
            .collect();
        return Column::new(name, ColumnType::Float64, values);
    }

    if present.iter().all(|value| parse_bool(value).is_some()) {
        let values = cells
            .iter()
            .map(|cell| {
                cell.as_deref()
                    .and_then(parse_bool)
                    .map_or(CellValue::Null, CellValue::Bool)
            })
            .collect();
        // A boolean column with gaps degrades to object.
        let dtype = if has_nulls {
            ColumnType::Object
        } else {
            ColumnType::Bool
        };
        return Column::new(name, dtype, values);
    }

    let values = cells
        .into_iter()
        .map(|cell| cell.map_or(CellValue::Null, CellValue::Text))
        .collect();
    Column::new(name, ColumnType::Object, values)
}

fn parse_bool(value: &str) -> Option<bool> {
    if TRUE_TOKENS.contains(&value) {
        Some(true)
    } else if FALSE_TOKENS.contains(&value) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_dataframe_like_types() {
        let table = CsvTableParser::parse(
            "geography,count,rate,flag,gappy,empty\n\
             Alabama,1,30.1,True,1,\n\
             Alaska,2,31,False,,NA\n",
        )
        .expect("csv should parse");

        let types: Vec<_> = table.columns().iter().map(Column::dtype).collect();
        assert_eq!(
            types,
            vec![
                ColumnType::Object,
                ColumnType::Int64,
                ColumnType::Float64,
                ColumnType::Bool,
                ColumnType::Float64,
                ColumnType::Float64,
            ]
        );
        assert_eq!(table.column("gappy").unwrap().null_count(), 1);
        assert_eq!(table.column("empty").unwrap().null_count(), 2);
        assert_eq!(table.column("rate").unwrap().f64_at(1), Some(31.0));
    }

    #[test]
    fn pads_short_rows_and_rejects_long_ones() {
        let table = CsvTableParser::parse("a,b,c\n1,2\n").expect("short rows are padded");
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column("c").unwrap().null_count(), 1);

        let err = CsvTableParser::parse("a,b\n1,2,3\n").unwrap_err();
        assert!(err.to_string().contains("Expected 2 fields"));
    }

    #[test]
    fn empty_input_has_no_columns() {
        let err = CsvTableParser::parse("").unwrap_err();
        assert!(err.to_string().contains("No columns to parse"));
    }

    #[test]
    fn header_only_input_is_an_empty_table() {
        let table = CsvTableParser::parse("a,b\n").expect("header only parses");
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("a").unwrap().dtype(), ColumnType::Object);
    }

    #[test]
    fn duplicate_headers_are_renamed() {
        let table = CsvTableParser::parse("a,a,,a\n1,2,3,4\n").expect("csv should parse");
        assert_eq!(table.column_names(), vec!["a", "a.1", "Unnamed: 2", "a.2"]);
    }
}
