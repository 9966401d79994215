use dataviz_store::models::{Column, Table};
use tracing::debug;

use super::{ControlError, ControlResult};

/// Maps a requested column name onto a table column: exact match first,
/// then the first case-insensitive match.
///
/// # Errors
/// Returns `ControlError::ColumnNotFound` listing every column name when
/// nothing matches.
pub fn resolve_column<'a>(table: &'a Table, requested: &str) -> ControlResult<&'a Column> {
    if let Some(column) = table.column(requested) {
        return Ok(column);
    }
    if let Some(column) = table.column_ignore_case(requested) {
        debug!(requested, resolved = column.name(), "resolved column ignoring case");
        return Ok(column);
    }
    Err(ControlError::ColumnNotFound {
        column: requested.to_string(),
        available: table.column_names().into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use dataviz_store::models::{CellValue, ColumnType};

    use super::*;

    fn table(names: &[&str]) -> Table {
        Table::new(
            names
                .iter()
                .map(|name| Column::new(*name, ColumnType::Int64, vec![CellValue::Int(1)]))
                .collect(),
        )
        .expect("valid table")
    }

    #[test]
    fn exact_match_beats_case_insensitive_match() {
        let table = table(&["rate", "Rate"]);
        assert_eq!(resolve_column(&table, "Rate").unwrap().name(), "Rate");
        assert_eq!(resolve_column(&table, "RATE").unwrap().name(), "rate");
    }

    #[test]
    fn missing_column_lists_available_names() {
        let table = table(&["geography", "Obesity"]);
        let err = resolve_column(&table, "diabetes").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column 'diabetes' not found in dataset. Available columns: [\"geography\", \"Obesity\"]"
        );
    }
}
