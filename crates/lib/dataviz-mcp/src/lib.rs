//! MCP server implementation for dataviz-mcp.
//!
//! This crate wires the dataset control plane into rmcp tool handlers. Every
//! tool answers with a single text block; failures are reported as text
//! beginning with `Error:` rather than as protocol errors.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use dataviz_core::control::DataVizControlPlane;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

const SERVER_INSTRUCTIONS: &str = r"dataviz-mcp inspects tabular health datasets (CSV files in the data directory) and renders PNG charts into the output directory.

Workflow:
1. Call `list_data_files` to see which datasets are available.
2. Call `describe_dataset` with a `filename` to see its shape, column types, null counts,
   the first rows, and summary statistics for numeric columns.
3. Render charts:
   - `generate_correlation_plot` plots Obesity against Diabetes. `plot_type` is `scatter`
     (default, with a fitted trend line and the correlation coefficient) or `heatmap`.
     The dataset must have columns named exactly `Obesity` and `Diabetes`.
   - `generate_state_comparison` ranks the `top_n` (default 10) rows of a `geography`
     column by `metric`. The metric column is matched ignoring case.
4. Call `list_generated_images` to see rendered charts, newest first.

Notes:
- Rows with a missing value in a required column are skipped.
- Rendering the same chart again overwrites the previous image.
- Any result starting with `Error:` describes what went wrong, including the available
  files or columns for not-found conditions.
- `help` lists the tools; `health` returns `ok`.";

/// MCP server wrapper around the dataset control plane and tool routers.
#[derive(Clone)]
pub struct DataVizMcp {
    tool_router: ToolRouter<Self>,
    control: Arc<DataVizControlPlane>,
}

impl DataVizMcp {
    /// Creates a new server owning the control plane.
    #[must_use]
    pub fn new(control: DataVizControlPlane) -> Self {
        Self::with_control(Arc::new(control))
    }

    /// Creates a new server using a shared control plane handle.
    #[must_use]
    pub fn with_control(control: Arc<DataVizControlPlane>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_catalog()
            + Self::tool_router_dataset()
            + Self::tool_router_plots()
            + Self::tool_router_context();
        Self {
            tool_router,
            control,
        }
    }

    pub(crate) fn control(&self) -> Arc<DataVizControlPlane> {
        Arc::clone(&self.control)
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl DataVizMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for DataVizMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
