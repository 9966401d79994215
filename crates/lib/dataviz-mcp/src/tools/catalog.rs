use rmcp::{
    ErrorData,
    model::CallToolResult,
    tool,
    tool_router,
};

use crate::DataVizMcp;
use crate::helpers;

#[tool_router(router = tool_router_catalog, vis = "pub")]
impl DataVizMcp {
    #[tool(description = "List the files in the data directory with their size in MB and extension.")]
    async fn list_data_files(&self) -> Result<CallToolResult, ErrorData> {
        let control = self.control();
        let text = match helpers::run_blocking("listing data files", move || {
            control.list_data_files()
        })
        .await
        {
            Ok(files) => helpers::format_data_files(&files),
            Err(text) => text,
        };
        Ok(helpers::text_result(text))
    }

    #[tool(description = "List the chart images in the output directory, newest first, with size in KB and creation time.")]
    async fn list_generated_images(&self) -> Result<CallToolResult, ErrorData> {
        let control = self.control();
        let text = match helpers::run_blocking("listing generated images", move || {
            control.list_generated_images()
        })
        .await
        {
            Ok(images) => helpers::format_images(&images),
            Err(text) => text,
        };
        Ok(helpers::text_result(text))
    }
}
