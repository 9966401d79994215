//! Filesystem store for the input and output directories.

pub mod fs;

pub use fs::{DataStore, DirectoryRole, StoreError, StoreResult};
