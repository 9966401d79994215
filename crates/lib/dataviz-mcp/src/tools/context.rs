use rmcp::{
    ErrorData,
    model::CallToolResult,
    tool,
    tool_router,
};

use crate::DataVizMcp;
use crate::helpers;

const COMMANDS: &[(&str, &str)] = &[
    ("help", "List the MCP commands this server offers."),
    ("health", "Health check. Returns 'ok'."),
    ("list_data_files", "List files in the data directory with size and type."),
    (
        "describe_dataset",
        "Shape, column types, null counts, first rows, and statistics of a CSV file.",
    ),
    (
        "generate_correlation_plot",
        "Obesity vs Diabetes as a scatter (default) or heatmap image.",
    ),
    (
        "generate_state_comparison",
        "Bar chart of the top N states by a metric column (default 10).",
    ),
    ("list_generated_images", "List rendered images, newest first."),
];

fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|(name, summary)| format!("{name} - {summary}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl DataVizMcp {
    #[tool(description = "List the MCP commands to get context with how this MCP server works.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(helpers::text_result(help_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_names_every_command_once() {
        let text = help_text();
        assert_eq!(text.lines().count(), COMMANDS.len());
        assert!(text.lines().any(|line| line.starts_with("generate_state_comparison - ")));
    }
}
