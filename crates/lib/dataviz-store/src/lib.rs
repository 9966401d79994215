//! Table model and naming helpers for dataviz-mcp.
//!
//! This crate defines the in-memory table shared by the parser, the query
//! layer and the renderers, plus the catalog records and the deterministic
//! artifact naming rules.

pub mod models;
pub mod schema;

pub use models::*;
