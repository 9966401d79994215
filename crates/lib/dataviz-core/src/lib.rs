//! Core services for dataviz-mcp.
//!
//! This crate owns the CSV parser, the filesystem store over the input and
//! output directories, the raster chart engine, and the control plane that
//! answers dataset queries and renders charts.

pub mod control;
pub mod parsers;
pub mod render;
pub mod stats;
pub mod store;
