use dataviz_store::models::{Column, PlotArtifact, PlotKind, PlotRequest, Table};
use dataviz_store::schema::{COLUMN_DIABETES, COLUMN_OBESITY};
use tracing::info;

use crate::render::{Chart, HeatmapChart, ScatterChart};
use crate::stats::{LinearFit, correlation_matrix, pearson};

use super::{ControlError, ControlResult, DataVizControlPlane};

impl DataVizControlPlane {
    /// Renders the Obesity/Diabetes relationship of a dataset as a scatter
    /// with fitted line or as a correlation heatmap.
    ///
    /// Both columns are matched by exact name. Rows missing either value
    /// are dropped before any statistic is computed.
    ///
    /// # Errors
    /// Returns `ControlError` if the file cannot be loaded, a column is
    /// missing, no complete rows remain, `plot_kind` is unknown, or the
    /// image cannot be written.
    pub fn generate_correlation_plot(
        &self,
        filename: &str,
        plot_kind: &str,
    ) -> ControlResult<PlotArtifact> {
        let table = self.load_table(filename)?;
        let (Some(obesity), Some(diabetes)) =
            (table.column(COLUMN_OBESITY), table.column(COLUMN_DIABETES))
        else {
            return Err(ControlError::MissingColumns {
                required: vec![COLUMN_OBESITY, COLUMN_DIABETES],
            });
        };

        let (xs, ys) = complete_pairs(&table, obesity, diabetes);
        if xs.is_empty() {
            return Err(ControlError::NoValidData {
                analysis: "correlation analysis",
            });
        }

        let kind: PlotKind = plot_kind
            .parse()
            .map_err(|_| ControlError::InvalidPlotKind(plot_kind.to_string()))?;
        let canvas = match kind {
            PlotKind::Scatter => scatter_chart(&xs, &ys).render()?,
            PlotKind::Heatmap => heatmap_chart(&xs, &ys).render()?,
        };

        let request = PlotRequest::Correlation {
            source_file: filename.to_string(),
            kind,
        };
        let artifact = self
            .store()
            .write_artifact(&request.output_file_name(), &canvas.encode_png()?)?;
        info!(
            filename,
            plot_kind = kind.as_str(),
            points = xs.len(),
            path = %artifact.output_path.display(),
            "rendered correlation plot"
        );
        Ok(artifact)
    }
}

/// Numeric values of the rows where both columns hold one. Non-numeric cells
/// are dropped like nulls.
fn complete_pairs(table: &Table, x: &Column, y: &Column) -> (Vec<f64>, Vec<f64>) {
    table
        .complete_rows(&[x, y])
        .into_iter()
        .filter_map(|row| Some((x.f64_at(row)?, y.f64_at(row)?)))
        .unzip()
}

fn scatter_chart(xs: &[f64], ys: &[f64]) -> ScatterChart {
    let correlation = pearson(xs, ys);
    ScatterChart {
        title: "Obesity vs Diabetes Prevalence by State".to_string(),
        x_label: "Obesity Prevalence (%)".to_string(),
        y_label: "Diabetes Prevalence (%)".to_string(),
        points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        trend: LinearFit::fit(xs, ys),
        annotation: Some(format!("Correlation: {}", format_coefficient(correlation))),
    }
}

fn heatmap_chart(xs: &[f64], ys: &[f64]) -> HeatmapChart {
    HeatmapChart {
        title: "Correlation Heatmap: Obesity vs Diabetes".to_string(),
        labels: vec![COLUMN_OBESITY.to_string(), COLUMN_DIABETES.to_string()],
        values: correlation_matrix(&[xs, ys]),
    }
}

fn format_coefficient(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.3}")
    }
}

#[cfg(test)]
mod tests {
    use crate::parsers::CsvTableParser;

    use super::*;

    #[test]
    fn only_complete_rows_become_points() {
        let table = CsvTableParser::parse(
            "geography,Obesity,Diabetes\n\
             Alabama,36.2,13.2\n\
             Alaska,,8.1\n\
             Arizona,31.4,10.5\n\
             Arkansas,,12.7\n\
             California,25.8,10.2\n\
             Colorado,24.0,\n",
        )
        .expect("fixture parses");
        let obesity = table.column(COLUMN_OBESITY).expect("obesity column");
        let diabetes = table.column(COLUMN_DIABETES).expect("diabetes column");

        let (xs, ys) = complete_pairs(&table, obesity, diabetes);
        assert_eq!(xs, vec![36.2, 31.4, 25.8]);
        assert_eq!(ys, vec![13.2, 10.5, 10.2]);
        assert_eq!(scatter_chart(&xs, &ys).points.len(), 3);
    }

    #[test]
    fn scatter_carries_fit_and_coefficient() {
        let chart = scatter_chart(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.annotation.as_deref(), Some("Correlation: 1.000"));
        let fit = chart.trend.expect("fit exists");
        assert!((fit.slope - 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_has_undefined_coefficient_and_no_fit() {
        let chart = scatter_chart(&[1.0], &[2.0]);
        assert_eq!(chart.annotation.as_deref(), Some("Correlation: nan"));
        assert!(chart.trend.is_none());
    }

    #[test]
    fn heatmap_is_two_by_two_with_unit_diagonal() {
        let chart = heatmap_chart(&[1.0, 2.0, 3.0], &[3.0, 1.0, 2.0]);
        assert_eq!(chart.values.len(), 2);
        assert!((chart.values[0][0] - 1.0).abs() < f64::EPSILON);
        assert!((chart.values[1][1] - 1.0).abs() < f64::EPSILON);
        assert!((chart.values[0][1] + 0.5).abs() < 1e-9);
    }
}
