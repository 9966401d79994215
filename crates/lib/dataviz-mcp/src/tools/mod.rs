//! MCP tool modules.
//!
//! Tools are grouped by domain: directory catalogs, dataset description,
//! chart rendering, and contextual help.

pub mod catalog;
pub mod dataset;
pub mod plots;
mod context;
