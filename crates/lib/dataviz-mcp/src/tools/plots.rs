use dataviz_store::schema::{DEFAULT_PLOT_KIND, DEFAULT_TOP_N};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::DataVizMcp;
use crate::helpers;

fn default_plot_type() -> String {
    DEFAULT_PLOT_KIND.to_string()
}

const fn default_top_n() -> i64 {
    DEFAULT_TOP_N
}

/// Parameters for rendering the Obesity/Diabetes correlation chart.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CorrelationPlotParams {
    /// Name of a CSV file in the data directory.
    pub filename: String,
    /// `scatter` or `heatmap`.
    #[serde(default = "default_plot_type")]
    pub plot_type: String,
}

/// Parameters for rendering a top-N state ranking.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct StateComparisonParams {
    /// Name of a CSV file in the data directory.
    pub filename: String,
    /// Column to rank by, matched ignoring case.
    pub metric: String,
    /// Number of states to show.
    #[serde(default = "default_top_n")]
    pub top_n: i64,
}

#[tool_router(router = tool_router_plots, vis = "pub")]
impl DataVizMcp {
    #[tool(description = "Plot Obesity against Diabetes for a dataset as a scatter with trend line or as a correlation heatmap. Returns the saved image path.")]
    async fn generate_correlation_plot(
        &self,
        Parameters(params): Parameters<CorrelationPlotParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let control = self.control();
        let CorrelationPlotParams {
            filename,
            plot_type,
        } = params;
        let (task_file, task_kind) = (filename.clone(), plot_type.clone());
        let text = match helpers::run_blocking("generating correlation plot", move || {
            control.generate_correlation_plot(&task_file, &task_kind)
        })
        .await
        {
            Ok(artifact) => format!(
                "Generated {plot_type} plot for {filename}. Image saved to: {}",
                artifact.output_path.display()
            ),
            Err(text) => text,
        };
        Ok(helpers::text_result(text))
    }

    #[tool(description = "Rank the top N states of a dataset by a metric column and render a bar chart. Requires a 'geography' column. Returns the saved image path.")]
    async fn generate_state_comparison(
        &self,
        Parameters(params): Parameters<StateComparisonParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let control = self.control();
        let StateComparisonParams {
            filename,
            metric,
            top_n,
        } = params;
        let task_metric = metric.clone();
        let text = match helpers::run_blocking("generating state comparison", move || {
            control.generate_state_comparison(&filename, &task_metric, top_n)
        })
        .await
        {
            Ok(artifact) => format!(
                "Generated state comparison chart for {metric} (top {top_n} states). Image saved to: {}",
                artifact.output_path.display()
            ),
            Err(text) => text,
        };
        Ok(helpers::text_result(text))
    }
}
