pub const COLUMN_OBESITY: &str = "Obesity";
pub const COLUMN_DIABETES: &str = "Diabetes";
pub const COLUMN_GEOGRAPHY: &str = "geography";

pub const CSV_EXTENSION: &str = "csv";
pub const IMAGE_EXTENSION: &str = "png";

pub const DEFAULT_PLOT_KIND: &str = "scatter";
pub const DEFAULT_TOP_N: i64 = 10;

/// Cell spellings read as missing values.
pub const NULL_TOKENS: &[&str] = &[
    "",
    "NA",
    "N/A",
    "n/a",
    "NaN",
    "nan",
    "-NaN",
    "-nan",
    "NULL",
    "null",
    "None",
    "<NA>",
    "#N/A",
    "#NA",
    "#N/A N/A",
    "1.#IND",
    "-1.#IND",
    "1.#QNAN",
    "-1.#QNAN",
];

pub const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
pub const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

#[must_use]
pub fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw)
}

/// Returns the part of a filename before its first `.`.
#[must_use]
pub fn source_stem(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

#[must_use]
pub fn make_correlation_file_name(source_file: &str, plot_kind: &str) -> String {
    format!(
        "{}_{plot_kind}_correlation.{IMAGE_EXTENSION}",
        source_stem(source_file)
    )
}

/// Path separators in the metric become `_` so the name stays a single
/// component of the output directory.
#[must_use]
pub fn make_comparison_file_name(source_file: &str, metric: &str, top_n: usize) -> String {
    let metric = metric.replace(['/', '\\'], "_");
    format!(
        "{}_{metric}_top{top_n}_comparison.{IMAGE_EXTENSION}",
        source_stem(source_file)
    )
}
