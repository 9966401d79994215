//! Parsers for tabular input files.
//!
//! Each parser turns a file format into the canonical `Table`, inferring
//! column types and null cells along the way.

pub mod csv_table;

pub use csv_table::{CsvParseError, CsvTableParser};
