use std::fmt::Write as _;

use dataviz_core::control::{ControlError, ControlResult};
use dataviz_store::models::{DataFile, ImageFile, format_float};
use rmcp::model::{CallToolResult, Content};
use tracing::warn;

pub const NO_DATA_FILES: &str = "No data files found in the data directory.";
pub const NO_IMAGES: &str = "No generated images found in the output directory.";

/// Wraps tool output in a successful single-text result.
pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

pub fn error_text(err: &ControlError) -> String {
    format!("Error: {err}")
}

/// Runs a blocking control-plane call off the async executor.
///
/// Both control failures and task failures come back as `Error:` text, so a
/// tool never surfaces a protocol error.
pub async fn run_blocking<T, F>(action: &'static str, task: F) -> Result<T, String>
where
    F: FnOnce() -> ControlResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            warn!(action, error = %err, "tool call failed");
            Err(error_text(&err))
        }
        Err(join) => {
            warn!(action, error = %join, "tool task aborted");
            Err(format!("Error: unexpected failure while {action}: {join}"))
        }
    }
}

pub fn format_data_files(files: &[DataFile]) -> String {
    if files.is_empty() {
        return NO_DATA_FILES.to_string();
    }
    let mut out = String::from(
        "Available Data Files:\n\n| Filename | Size (MB) | Type |\n|----------|----------|------|\n",
    );
    for file in files {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            file.name,
            format_float(file.size_mb()),
            file.extension
        );
    }
    out
}

pub fn format_images(images: &[ImageFile]) -> String {
    if images.is_empty() {
        return NO_IMAGES.to_string();
    }
    let mut out = String::from(
        "Generated Visualization Images:\n\n| Filename | Size (KB) | Created |\n|----------|-----------|--------|\n",
    );
    for image in images {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            image.name,
            format_float(image.size_kb()),
            image.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    out
}

#[cfg(test)]
pub fn result_text(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map(|text| text.text.as_str())
        .expect("tool result carries one text block")
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;

    #[test]
    fn data_files_render_as_markdown_rows() {
        let files = vec![
            DataFile {
                name: "states.csv".to_string(),
                size_bytes: 3 * 1024 * 1024 / 2,
                extension: ".csv".to_string(),
            },
            DataFile {
                name: "README".to_string(),
                size_bytes: 10,
                extension: String::new(),
            },
        ];
        let text = format_data_files(&files);
        assert!(text.starts_with("Available Data Files:\n\n| Filename | Size (MB) | Type |\n"));
        assert!(text.contains("| states.csv | 1.5 | .csv |\n"));
        assert!(text.contains("| README | 0.0 |  |\n"));
    }

    #[test]
    fn empty_listings_use_fixed_messages() {
        assert_eq!(format_data_files(&[]), NO_DATA_FILES);
        assert_eq!(format_images(&[]), NO_IMAGES);
    }

    #[test]
    fn images_show_kibibytes_and_minutes() {
        let created_at = Local
            .with_ymd_and_hms(2024, 5, 17, 9, 30, 12)
            .single()
            .expect("unambiguous local time");
        let images = vec![ImageFile {
            name: "states_scatter_correlation.png".to_string(),
            size_bytes: 2048,
            created_at,
        }];
        let text = format_images(&images);
        assert!(text.contains("| states_scatter_correlation.png | 2.0 | 2024-05-17 09:30 |"));
    }

    #[test]
    fn control_errors_carry_the_prefix() {
        let text = error_text(&ControlError::MissingGeographyColumn);
        assert_eq!(
            text,
            "Error: Dataset must contain 'geography' column for state comparison."
        );
    }

    #[tokio::test]
    async fn blocking_failures_become_error_text() {
        let result: Result<(), String> =
            run_blocking("testing", || Err(ControlError::InvalidTopN(0))).await;
        assert_eq!(
            result.unwrap_err(),
            "Error: top_n must be greater than zero (got 0)."
        );
    }
}
