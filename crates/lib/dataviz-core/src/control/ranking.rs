use std::cmp::Ordering;

use dataviz_store::models::{Column, PlotArtifact, PlotRequest, Table};
use dataviz_store::schema::COLUMN_GEOGRAPHY;
use tracing::info;

use crate::render::{Bar, BarChart, Chart};

use super::{ControlError, ControlResult, DataVizControlPlane, resolve_column};

impl DataVizControlPlane {
    /// Renders the `top_n` geographies with the highest value of `metric`
    /// as a labelled bar chart.
    ///
    /// The metric is resolved ignoring case; the geography column must be
    /// named exactly `geography`. Ties keep their original row order.
    ///
    /// # Errors
    /// Returns `ControlError` if `top_n` is not positive, the file cannot be
    /// loaded, either column is missing, no complete rows remain, or the
    /// image cannot be written.
    pub fn generate_state_comparison(
        &self,
        filename: &str,
        metric: &str,
        top_n: i64,
    ) -> ControlResult<PlotArtifact> {
        let limit = usize::try_from(top_n)
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or(ControlError::InvalidTopN(top_n))?;

        let table = self.load_table(filename)?;
        let metric_column = resolve_column(&table, metric)?;
        let geography = table
            .column(COLUMN_GEOGRAPHY)
            .ok_or(ControlError::MissingGeographyColumn)?;

        let bars = ranked_bars(&table, metric_column, geography, limit);
        if bars.is_empty() {
            return Err(ControlError::NoValidData {
                analysis: "state comparison",
            });
        }

        let chart = comparison_chart(metric, limit, bars);
        let canvas = chart.render()?;
        let request = PlotRequest::Ranking {
            source_file: filename.to_string(),
            metric: metric.to_string(),
            top_n: limit,
        };
        let artifact = self
            .store()
            .write_artifact(&request.output_file_name(), &canvas.encode_png()?)?;
        info!(
            filename,
            metric,
            column = metric_column.name(),
            bars = chart.bars.len(),
            path = %artifact.output_path.display(),
            "rendered state comparison"
        );
        Ok(artifact)
    }
}

/// Rows with both values present, highest metric first, cut to `limit`.
/// Equal values keep their row order.
fn ranked_bars(table: &Table, metric: &Column, geography: &Column, limit: usize) -> Vec<Bar> {
    let mut bars: Vec<Bar> = table
        .complete_rows(&[metric, geography])
        .into_iter()
        .filter_map(|row| {
            Some(Bar {
                label: geography.get(row)?.to_string(),
                value: metric.f64_at(row)?,
            })
        })
        .collect();
    // NaN never reaches here, so partial_cmp only sees ordered values.
    bars.sort_by(|left, right| {
        right
            .value
            .partial_cmp(&left.value)
            .unwrap_or(Ordering::Equal)
    });
    bars.truncate(limit);
    bars
}

fn comparison_chart(metric: &str, top_n: usize, bars: Vec<Bar>) -> BarChart {
    let metric_title = title_case(metric);
    BarChart {
        title: format!("Top {top_n} States by {metric_title} Prevalence"),
        x_label: "State".to_string(),
        y_label: format!("{metric_title} Prevalence (%)"),
        bars,
        value_suffix: "%".to_string(),
    }
}

/// Uppercases the first letter of each alphabetic run and lowercases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(ch);
            previous_alpha = false;
        }
    }
    out
}
