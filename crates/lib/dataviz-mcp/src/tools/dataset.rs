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

/// Parameters for describing a dataset.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DescribeDatasetParams {
    /// Name of a CSV file in the data directory, e.g. `states.csv`.
    pub filename: String,
}

#[tool_router(router = tool_router_dataset, vis = "pub")]
impl DataVizMcp {
    #[tool(description = "Describe a CSV dataset: shape, column types, null counts, first rows, and summary statistics.")]
    async fn describe_dataset(
        &self,
        Parameters(params): Parameters<DescribeDatasetParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let control = self.control();
        let text = match helpers::run_blocking("describing dataset", move || {
            control.describe_dataset(&params.filename)
        })
        .await
        {
            Ok(report) => report.to_string(),
            Err(text) => text,
        };
        Ok(helpers::text_result(text))
    }
}
